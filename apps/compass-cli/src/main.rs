use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use compass_bank::{BankRules, QuestionBank, letter_index, option_letter};
use compass_common::PathId;
use compass_engine::QuizEngine;
use compass_rank::{RankConfig, RankedResult, Ranker, Rounding, ordinal_label};
use compass_scene::{
    Collectible, Interaction, InteractionLog, SceneRenderer, SceneTheme, SceneView,
    TextSceneRenderer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "compass", about = "Career compass quiz in the terminal")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Question bank file (.json, .yaml, .yml); defaults to the built-in quiz
    #[arg(short, long, global = true)]
    bank: Option<PathBuf>,

    /// Accept banks with any option count and zero-point options
    #[arg(long, global = true)]
    permissive: bool,

    /// How percentages are rounded in the results
    #[arg(short, long, global = true, value_enum, default_value_t = RoundingArg::Independent)]
    rounding: RoundingArg,

    /// Visual theme for the scene readout
    #[arg(short, long, global = true, value_enum, default_value_t = ThemeArg::Islands)]
    theme: ThemeArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions, bank summary and fingerprint
    Info,
    /// Load and validate a bank file
    Validate {
        /// Bank file to check
        file: PathBuf,
    },
    /// Take the quiz interactively on stdin
    Play,
    /// Answer every question from a list and print the ranking
    Simulate {
        /// One answer per question in bank order: option letters or value keys
        #[arg(short, long, value_delimiter = ',', required = true)]
        answers: Vec<String>,
        /// Print the ranked result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoundingArg {
    Independent,
    LargestRemainder,
}

impl From<RoundingArg> for Rounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Independent => Rounding::Independent,
            RoundingArg::LargestRemainder => Rounding::LargestRemainder,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Islands,
    Maze,
    PixelArt,
    Roads,
}

impl From<ThemeArg> for SceneTheme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Islands => SceneTheme::Islands,
            ThemeArg::Maze => SceneTheme::Maze,
            ThemeArg::PixelArt => SceneTheme::PixelArt,
            ThemeArg::Roads => SceneTheme::Roads,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    let rules = if cli.permissive {
        BankRules::permissive()
    } else {
        BankRules::default()
    };
    let ranker = Ranker::new(RankConfig {
        rounding: cli.rounding.into(),
    });
    let theme = SceneTheme::from(cli.theme);

    match cli.command {
        Commands::Info => {
            let bank = load_bank(cli.bank.as_ref(), rules)?;
            println!("compass v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", compass_common::crate_info());
            println!("bank: {}", compass_bank::crate_info());
            println!("engine: {}", compass_engine::crate_info());
            println!("rank: {}", compass_rank::crate_info());
            println!("scene: {}", compass_scene::crate_info());
            println!();
            println!(
                "questions={} paths={} fingerprint={}",
                bank.len(),
                bank.catalog().len(),
                bank.fingerprint()
            );
            for profile in bank.catalog().iter() {
                println!("  {} {:<12} {}", profile.icon, profile.id, profile.title);
            }
        }
        Commands::Validate { file } => {
            let bank = QuestionBank::load(&file, rules)
                .with_context(|| format!("invalid bank {}", file.display()))?;
            println!(
                "{}: OK ({} questions, fingerprint {})",
                file.display(),
                bank.len(),
                bank.fingerprint()
            );
        }
        Commands::Play => {
            let bank = load_bank(cli.bank.as_ref(), rules)?;
            let mut engine = QuizEngine::new(bank);
            let stdin = io::stdin();
            let stdout = io::stdout();
            play(&mut engine, theme, &mut stdin.lock(), &mut stdout.lock())?;
            let result = ranker.rank(&engine)?;
            print_result(&result, &engine);
        }
        Commands::Simulate { answers, json } => {
            let bank = load_bank(cli.bank.as_ref(), rules)?;
            let mut engine = QuizEngine::new(bank);
            simulate(&mut engine, &answers)?;
            let result = ranker.rank(&engine)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let view = SceneView::from_snapshot(&engine.snapshot(), engine.bank().catalog(), theme);
                print!("{}", TextSceneRenderer::new().render(&view));
                println!();
                print_result(&result, &engine);
            }
        }
    }

    Ok(())
}

fn load_bank(path: Option<&PathBuf>, rules: BankRules) -> anyhow::Result<Arc<QuestionBank>> {
    let bank = match path {
        Some(path) => QuestionBank::load(path, rules)
            .with_context(|| format!("failed to load bank {}", path.display()))?,
        None => QuestionBank::builtin(),
    };
    tracing::info!(
        questions = bank.len(),
        fingerprint = bank.fingerprint(),
        "bank loaded"
    );
    Ok(Arc::new(bank))
}

/// Apply `answers` to the bank's questions in order.
///
/// A single letter selects by position (A = first option); anything else
/// is matched against option value keys.
fn simulate(engine: &mut QuizEngine, answers: &[String]) -> anyhow::Result<()> {
    let ids: Vec<_> = engine.bank().questions().iter().map(|q| q.id).collect();
    if answers.len() != ids.len() {
        bail!(
            "expected {} answers, one per question, got {}",
            ids.len(),
            answers.len()
        );
    }
    for (id, answer) in ids.into_iter().zip(answers) {
        let answer = answer.trim();
        let outcome = match single_letter(answer) {
            Some(index) => engine.submit_choice(id, index),
            None => engine.submit_value(id, answer),
        };
        outcome.with_context(|| format!("answer {answer:?} for {id}"))?;
    }
    Ok(())
}

fn single_letter(s: &str) -> Option<usize> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => letter_index(c),
        _ => None,
    }
}

/// Scene commands accepted at the answer prompt: `:coin`, `:boost`, `:visit <path>`.
fn parse_interaction(line: &str) -> Option<Interaction> {
    let command = line.strip_prefix(':')?;
    let mut words = command.split_whitespace();
    match (words.next()?, words.next()) {
        ("coin", None) => Some(Interaction::Collected(Collectible::Coin)),
        ("boost", None) => Some(Interaction::Collected(Collectible::PowerUp)),
        ("visit", Some(path)) => Some(Interaction::PathClicked(PathId::from(path))),
        _ => None,
    }
}

/// Ask each question on `input` until the quiz is complete.
///
/// Scene commands can be entered at any prompt; they only produce toasts.
fn play(
    engine: &mut QuizEngine,
    theme: SceneTheme,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let renderer = TextSceneRenderer::new();
    let mut interactions = InteractionLog::new();
    while let Some(question) = engine.current_question().cloned() {
        let view = SceneView::from_snapshot(&engine.snapshot(), engine.bank().catalog(), theme);
        write!(out, "{}", renderer.render(&view))?;
        writeln!(out, "[{}] {}", question.category.label(), question.prompt)?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}) {}", option_letter(i), option.text)?;
        }

        loop {
            write!(out, "> ")?;
            out.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                bail!("input closed before the quiz was finished");
            }
            let line = line.trim();
            if let Some(interaction) = parse_interaction(line) {
                let toast = interactions.record(interaction, engine.bank().catalog());
                writeln!(out, "{toast}")?;
                continue;
            }
            let Some(index) = single_letter(line) else {
                let last = option_letter(question.options.len() - 1);
                writeln!(out, "Pick a letter between A and {last}")?;
                continue;
            };
            match engine.submit_choice(question.id, index) {
                Ok(_) => {
                    writeln!(out, "Great choice! Moving forward on your journey...\n")?;
                    break;
                }
                Err(e) => writeln!(out, "{e}")?,
            }
        }
    }
    Ok(())
}

fn print_result(result: &RankedResult, engine: &QuizEngine) {
    let catalog = engine.bank().catalog();
    println!("Your Career Journey Results");
    if let Some(best) = result.best() {
        if let Some(profile) = catalog.get(&best.path) {
            println!("{} {} ({}% match)", profile.icon, profile.title, best.percentage);
            println!("{}", profile.description);
            for career in &profile.careers {
                println!("  - {career}");
            }
        } else {
            println!("{} ({}% match)", best.path, best.percentage);
        }
    }
    println!();
    for (i, entry) in result.entries().iter().enumerate() {
        println!(
            "{:<12} {:<26} {:>4} pts {:>4}%",
            ordinal_label(i),
            catalog.title_of(&entry.path),
            entry.score,
            entry.percentage
        );
    }
    println!(
        "total={} answered={}",
        result.total_score, result.answered_questions
    );
}
