//! Analyze command: full documentation quality report.

use anyhow::bail;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use docqa_core::settings::{Settings, StyleCheck};
use docqa_core::structure::{HeadingNode, nest_headings};
use docqa_core::{AnalysisReport, ScoreBand, TargetReport, analyze, evaluate_targets};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Document to analyze (`.md`, `.markdown`, `.txt`; `-` reads stdin).
    pub file: Utf8PathBuf,

    /// Style checks to run (comma-separated). Omit to use configured checks.
    #[arg(long, value_delimiter = ',', value_enum)]
    pub checks: Option<Vec<StyleCheck>>,

    /// Grade level above which readability suggests simplifying.
    #[arg(long, value_name = "GRADE")]
    pub target_grade: Option<f64>,

    /// Maximum words per sentence.
    #[arg(long, value_name = "WORDS")]
    pub max_sentence_length: Option<usize>,

    /// Skip the glossary pass (capitalization checks still run).
    #[arg(long)]
    pub glossary_off: bool,

    /// Fail when any quality target is not met.
    #[arg(long)]
    pub gate: bool,
}

impl AnalyzeArgs {
    /// Apply command-line overrides on top of configured settings.
    pub fn effective_settings(&self, base: &Settings) -> Settings {
        let mut settings = base.clone();
        if let Some(ref checks) = self.checks {
            settings.style_guide.set_enabled(checks);
        }
        if let Some(grade) = self.target_grade {
            settings.readability_targets.target_grade = grade;
        }
        if let Some(max) = self.max_sentence_length {
            settings.readability_targets.max_sentence_length = max;
        }
        if self.glossary_off {
            settings.terminology_glossary = Some(Vec::new());
        }
        settings
    }
}

/// Analyze one document and print the report.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    settings: &Settings,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    debug!(checks = ?args.checks, gate = args.gate, "executing analyze command");

    let content = super::read_input(&args.file, max_input)?;
    let settings = args.effective_settings(settings);
    let report = analyze(&content, Some(&settings));
    let targets = evaluate_targets(&report, &settings.quality_targets);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&args.file, &report);
        if args.gate {
            print_targets(&targets);
        }
    }

    if args.gate && !targets.pass {
        let failed: Vec<_> = targets
            .failures()
            .map(|c| format!("{} {} < {}", c.dimension, c.score, c.target))
            .collect();
        bail!(
            "{} did not meet quality targets: {}",
            args.file,
            failed.join(", ")
        );
    }

    Ok(())
}

fn colored_score(score: u8) -> String {
    if score >= 80 {
        score.green().to_string()
    } else if score >= 60 {
        score.yellow().to_string()
    } else {
        score.red().to_string()
    }
}

fn print_report(file: &Utf8Path, report: &AnalysisReport) {
    let scores = report.dimension_scores();
    println!("{}", file.bold());
    println!(
        "\n  {} {}/100 ({})",
        "Overall:".cyan(),
        colored_score(scores.overall),
        ScoreBand::from_score(scores.overall),
    );
    for (label, score) in [
        ("Structure", scores.structure),
        ("Readability", scores.readability),
        ("Links", scores.links),
        ("Style", scores.style),
        ("Terminology", scores.terminology),
    ] {
        println!("    {:<12} {}", label.dimmed(), colored_score(score));
    }

    let r = &report.readability;
    println!(
        "\n  {} Grade {:.1} ({}), {} sentences, {} words, {} complex",
        "Readability:".cyan(),
        r.flesch_kincaid,
        r.reading_level,
        r.sentences,
        r.words,
        r.complex_words,
    );
    println!(
        "  {} {} total, {} internal, {} external, {} broken",
        "Links:".cyan(),
        report.links.total_links,
        report.links.internal_links.len(),
        report.links.external_links.len(),
        report.links.broken_links.len(),
    );

    let outline = nest_headings(&report.structure.heading_hierarchy.structure);
    if !outline.is_empty() {
        println!("\n  {}", "Outline:".cyan());
        print_outline(&outline, 2);
    }

    print_issues(report);

    let suggestions: Vec<&String> = report
        .structure
        .suggestions
        .iter()
        .chain(&report.readability.suggestions)
        .collect();
    if !suggestions.is_empty() {
        println!("\n  {}", "Suggestions:".cyan());
        for s in suggestions {
            println!("    - {s}");
        }
    }
}

fn print_outline(nodes: &[HeadingNode], depth: usize) {
    for node in nodes {
        println!(
            "{:indent$}{} {}",
            "",
            "#".repeat(usize::from(node.level)).dimmed(),
            node.text.trim(),
            indent = depth * 2
        );
        print_outline(&node.children, depth + 1);
    }
}

fn print_issues(report: &AnalysisReport) {
    let structure = &report.structure.issues;
    let style = &report.style.issues;
    let terms = &report.terminology.inconsistencies;
    let broken = &report.links.broken_links;
    if structure.is_empty() && style.is_empty() && terms.is_empty() && broken.is_empty() {
        println!("\n  {}", "No issues found.".green());
        return;
    }

    println!("\n  {}", "Issues:".cyan());
    for issue in structure {
        let at = issue
            .line
            .map_or_else(|| "-".to_string(), |l| l.to_string());
        println!(
            "    {:>5}  {:<8} {}",
            at.dimmed(),
            issue.severity.as_str().yellow(),
            issue.message
        );
    }
    for link in broken {
        println!(
            "    {:>5}  {:<8} broken link {}: {}",
            link.line.dimmed(),
            "error".red(),
            link.url,
            link.error
        );
    }
    for issue in style {
        let at = format!("{}:{}", issue.line, issue.column);
        println!(
            "    {:>5}  {:<8} {} [{}]",
            at.dimmed(),
            issue.severity.as_str().yellow(),
            issue.message,
            issue.rule.dimmed()
        );
    }
    for issue in terms {
        let first = issue
            .occurrences
            .first()
            .map_or_else(|| "-".to_string(), |o| format!("{}:{}", o.line, o.column));
        println!(
            "    {:>5}  {:<8} {} ({})",
            first.dimmed(),
            "info".dimmed(),
            issue.suggestion,
            issue.alternatives.join(", ")
        );
    }
}

fn print_targets(targets: &TargetReport) {
    println!("\n  {}", "Quality targets:".cyan());
    for check in &targets.checks {
        let mark = if check.met {
            "pass".green().to_string()
        } else {
            "FAIL".red().to_string()
        };
        println!(
            "    {:<12} {:>3} / {:>3}  {}",
            check.dimension, check.score, check.target, mark
        );
    }
}
