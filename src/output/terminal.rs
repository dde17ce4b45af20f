// Colored terminal output for user summaries, cohort reports, and
// vocabulary comparisons.

use colored::Colorize;

use crate::analysis::cohort::CohortReport;
use crate::analysis::user::{UserSummary, VocabularyComparison};

/// Color a JS divergence by how far apart the two vocabularies are.
fn colorize_divergence(value: f64) -> colored::ColoredString {
    let text = format!("{value:.4}");
    if value >= 0.5 {
        text.red().bold()
    } else if value >= 0.25 {
        text.yellow()
    } else {
        text.green()
    }
}

/// Display a single user's divergence summary.
pub fn display_user_summary(summary: &UserSummary) {
    let r = &summary.result;
    println!(
        "\n{}",
        format!("=== Ad vs organic vocabulary for user {} ===", summary.user).bold()
    );
    println!("  Unique words (union):     {}", r.num_unique_words);
    println!(
        "  Vocabulary sizes summed:  {} {}",
        r.num_total_words,
        "(shared words counted twice)".dimmed()
    );
    println!(
        "  JS divergence P||Q: {}   distance: {:.4}",
        colorize_divergence(r.js_divergence_pq),
        r.js_distance_pq
    );
    println!(
        "  JS divergence Q||P: {}   distance: {:.4}",
        colorize_divergence(r.js_divergence_qp),
        r.js_distance_qp
    );
    println!("{}", "  P = advertisements, Q = organic videos".dimmed());
}

/// Display the cohort table with its mean / std rows and exclusions.
pub fn display_cohort_report(report: &CohortReport) {
    if report.users.is_empty() {
        println!("No users had both advertisement and organic suggested words.");
    } else {
        println!(
            "\n{}",
            format!("=== Cohort Report ({} users) ===", report.users.len()).bold()
        );
        println!();

        println!(
            "  {:<12} {:>7} {:>7} {:>9} {:>9} {:>9} {:>9}",
            "User".dimmed(),
            "Unique".dimmed(),
            "Total".dimmed(),
            "JSD P|Q".dimmed(),
            "Dist P|Q".dimmed(),
            "JSD Q|P".dimmed(),
            "Dist Q|P".dimmed(),
        );
        println!("  {}", "-".repeat(70).dimmed());

        for summary in &report.users {
            let r = &summary.result;
            println!(
                "  {:<12} {:>7} {:>7} {:>9} {:>9.4} {:>9} {:>9.4}",
                super::truncate_chars(&summary.user, 12),
                r.num_unique_words,
                r.num_total_words,
                colorize_divergence(r.js_divergence_pq),
                r.js_distance_pq,
                colorize_divergence(r.js_divergence_qp),
                r.js_distance_qp,
            );
        }

        println!("  {}", "-".repeat(70).dimmed());
        for row in [&report.mean, &report.std].into_iter().flatten() {
            let v = row.values();
            println!(
                "  {:<12} {:>7.1} {:>7.1} {:>9.4} {:>9.4} {:>9.4} {:>9.4}",
                row.label.bold(),
                v[0],
                v[1],
                v[2],
                v[3],
                v[4],
                v[5],
            );
        }

        if let Some(jsd) = report.columns.iter().find(|c| c.column == "js_divergence_pq") {
            let s = &jsd.summary;
            println!(
                "\n  JSD quartiles: min {:.4}  25% {:.4}  50% {:.4}  75% {:.4}  max {:.4}",
                s.min, s.q1, s.median, s.q3, s.max
            );
        }
    }

    if !report.failures.is_empty() {
        println!();
        for failure in &report.failures {
            println!(
                "  {} excluded {} ({}): {}",
                "Warning:".yellow(),
                failure.user.as_deref().unwrap_or("?"),
                failure.file.display(),
                failure.reason
            );
        }
    }
}

/// Display the most probable ad and organic tokens side by side.
pub fn display_vocabulary(comparison: &VocabularyComparison, top_n: usize) {
    println!(
        "\n{}",
        format!(
            "=== Vocabulary: {} ad words, {} organic words, {} shared ===",
            comparison.ad.len(),
            comparison.organic.len(),
            comparison.shared_tokens()
        )
        .bold()
    );
    println!();

    println!(
        "  {:>3}  {:<24} {:>7}   {:<24} {:>7}",
        "#".dimmed(),
        "Advertisement".dimmed(),
        "p".dimmed(),
        "Organic".dimmed(),
        "q".dimmed(),
    );

    let ad_top = comparison.ad.top(top_n);
    let organic_top = comparison.organic.top(top_n);

    for i in 0..ad_top.len().max(organic_top.len()) {
        let (ad_word, ad_p) = cell(ad_top.get(i).copied());
        let (org_word, org_q) = cell(organic_top.get(i).copied());

        // Words present on both sides stand out
        let ad_word = if ad_top.get(i).is_some_and(|(t, _)| comparison.organic.contains(t)) {
            ad_word.bright_cyan()
        } else {
            ad_word.normal()
        };
        let org_word = if organic_top.get(i).is_some_and(|(t, _)| comparison.ad.contains(t)) {
            org_word.bright_cyan()
        } else {
            org_word.normal()
        };

        println!(
            "  {:>3}. {:<24} {:>7}   {:<24} {:>7}",
            i + 1,
            ad_word,
            ad_p,
            org_word,
            org_q
        );
    }
    println!("\n  {}", "Highlighted words appear in both vocabularies.".dimmed());
}

fn cell(entry: Option<(&str, f64)>) -> (String, String) {
    match entry {
        Some((token, p)) => (super::truncate_chars(token, 21), format!("{p:.4}")),
        None => (String::new(), String::new()),
    }
}
