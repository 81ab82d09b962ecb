//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::PermutationReport;
use crate::store::Corpus;

/// Width of the longest histogram bar in characters.
const BAR_WIDTH: usize = 40;

/// Significance level used for the verdict line.
const ALPHA: f64 = 0.05;

/// Format a permutation report for human-readable terminal output.
///
/// Prints the observed statistic and p-value, then the null distribution as
/// a horizontal bar chart with the observed statistic's bin marked.
pub fn format_report(report: &PermutationReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);
    let meta = &report.metadata;

    output.push_str("sway-analysis permutation test\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    output.push_str(&format!(
        "  Paired values: {} (A: {}, B: {})\n",
        meta.paired_len, meta.len_a, meta.len_b
    ));
    output.push_str(&format!(
        "  Permutations:  {} (seed {})\n",
        meta.permutations, meta.seed
    ));
    output.push('\n');

    if report.is_significant(ALPHA) {
        output.push_str(&format!(
            "  {}\n\n",
            "\u{26A0} Difference unlikely under exchangeability".yellow().bold()
        ));
    } else {
        output.push_str(&format!(
            "  {}\n\n",
            "\u{2713} Difference consistent with chance".green().bold()
        ));
    }

    output.push_str(&format!(
        "    Observed |mean difference|: {:.6}\n",
        report.result.observed_statistic
    ));
    output.push_str(&format!("    p-value: {:.3}\n", report.result.p_value));
    output.push_str(&format!(
        "    95th percentile of null:    {:.6}\n",
        report.critical_value
    ));
    output.push('\n');

    output.push_str(&format_histogram(report));
    output.push('\n');
    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Note: p-value counts permutations with statistic >= observed ({:.2}s).\n",
        meta.runtime_secs
    ));

    output
}

/// Horizontal bar chart of the histogram.
fn format_histogram(report: &PermutationReport) -> String {
    let mut output = String::new();
    let peak = report.histogram.iter().map(|b| b.count).max().unwrap_or(0);
    let observed_bin = report.observed_bin();

    for (i, bin) in report.histogram.iter().enumerate() {
        let len = if peak == 0 {
            0
        } else {
            (bin.count * BAR_WIDTH).div_ceil(peak)
        };
        let bar = "\u{2588}".repeat(len);
        let bar = if Some(i) == observed_bin {
            format!("{} \u{25C0} observed", bar.red())
        } else {
            bar.cyan().to_string()
        };
        output.push_str(&format!(
            "    [{:>9.5}, {:>9.5}) {:>5} {}\n",
            bin.x0, bin.x1, bin.count, bar
        ));
    }
    if observed_bin.is_none() {
        output.push_str("    observed statistic lies beyond every permutation\n");
    }
    output
}

/// One line per condition with participant and sample counts.
pub fn format_corpus_summary(corpus: &Corpus) -> String {
    let mut output = String::new();
    for dataset in corpus.datasets() {
        let condition = dataset.condition();
        output.push_str(&format!(
            "  {} {:<22} {:>3} participants {:>8} samples",
            condition.code().bold(),
            condition.label(),
            dataset.len(),
            dataset.sample_count()
        ));
        if dataset.dropped_rows() > 0 {
            output.push_str(&format!(
                " {}",
                format!("({} rows dropped)", dataset.dropped_rows()).yellow()
            ));
        }
        output.push('\n');
    }
    for condition in corpus.missing() {
        output.push_str(&format!(
            "  {} {:<22} {}\n",
            condition.code().bold(),
            condition.label(),
            "not loaded".red()
        ));
    }
    output
}
