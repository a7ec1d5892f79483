use clap::{Args, Parser, Subcommand};
use pentacross_core::config::{GenerationOptions, ThemeWord};
use pentacross_core::generate;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
/// A command line tool for synthesizing 5x5 themed crossword puzzles.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a puzzle from a list of theme words.
    Generate(Generate),
    /// List the black-square pattern library.
    Patterns,
}

#[derive(Args)]
struct Generate {
    /// Theme words to place, space separated. Each is `TEXT` or `TEXT:CLUE`; case on the text is
    /// normalized automatically, the clue (if any) is passed through verbatim.
    #[arg(required = true)]
    theme_words: Vec<String>,

    /// Theme words to additionally boost above ordinary filler when choosing crossing words.
    #[arg(long, value_delimiter = ',')]
    boost: Vec<String>,

    /// Random seed controlling tie-breaks in the fill search.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Overall time budget in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Maximum number of pattern/retry attempts before settling for the best candidate found.
    #[arg(long, default_value_t = 24)]
    max_candidates: usize,

    /// Restrict to specific named patterns instead of trying the whole library.
    #[arg(long, value_delimiter = ',')]
    pattern: Vec<String>,

    /// How strongly to favor thematic words over plain filler, from 0.0 to 1.0.
    #[arg(long, default_value_t = 0.5)]
    bias: f32,
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Patterns => run_patterns(),
    }
}

fn run_generate(args: Generate) {
    let theme_words = args
        .theme_words
        .iter()
        .map(|w| {
            let (text, clue) = w.split_once(':').map_or((w.as_str(), None), |(t, c)| (t, Some(c)));
            let upper = text.to_uppercase();
            let mut theme_word = if args.boost.iter().any(|b| b.eq_ignore_ascii_case(text)) {
                ThemeWord::boosted(upper)
            } else {
                ThemeWord::new(upper)
            };
            if let Some(clue) = clue {
                theme_word = theme_word.with_clue(clue);
            }
            theme_word
        })
        .collect();

    let options = GenerationOptions {
        theme_words,
        seed: args.seed,
        time_budget: Duration::from_millis(args.timeout_ms),
        max_candidates: args.max_candidates,
        pattern_names: if args.pattern.is_empty() { None } else { Some(args.pattern) },
        bias: args.bias,
        ..GenerationOptions::default()
    };

    let result = generate(&options);
    print_grid(&result);

    if !result.success {
        eprintln!("warning: could not complete a full fill within the time budget; showing the best partial attempt");
        std::process::exit(1);
    }
}

fn print_grid(result: &pentacross_core::GenerationResult) {
    use pentacross_core::types::{Direction, GRID_SIZE};

    let mut chars = vec![vec!['#'; GRID_SIZE]; GRID_SIZE];
    for (row, col) in &result.black_cells {
        chars[*row][*col] = '.';
    }
    for word in &result.words {
        let (dr, dc) = if word.direction == Direction::Across { (0isize, 1isize) } else { (1, 0) };
        for (i, ch) in word.text.chars().enumerate() {
            let r = (word.row as isize + dr * i as isize) as usize;
            let c = (word.col as isize + dc * i as isize) as usize;
            chars[r][c] = ch;
        }
    }
    for row in &chars {
        println!("{}", row.iter().collect::<String>());
    }

    println!();
    let mut across: Vec<_> = result.words.iter().filter(|w| w.direction == Direction::Across).collect();
    let mut down: Vec<_> = result.words.iter().filter(|w| w.direction == Direction::Down).collect();
    across.sort_by_key(|w| w.number);
    down.sort_by_key(|w| w.number);
    println!("Across:");
    for word in across {
        print_clue_line(word);
    }
    println!("Down:");
    for word in down {
        print_clue_line(word);
    }

    if !result.unplaced_theme_words.is_empty() {
        println!();
        println!("unplaced theme words:");
        for theme_word in &result.unplaced_theme_words {
            println!("  {}", theme_word.text);
        }
    }

    println!();
    println!(
        "patterns tried: {}, repairs: {}, candidates generated: {}",
        result.stats.patterns_tried, result.stats.repair_iterations, result.stats.candidates_generated
    );
}

fn print_clue_line(word: &pentacross_core::PlacedWord) {
    match &word.clue {
        Some(clue) => println!("  {:>2}. {} - {}", word.number, word.text, clue),
        None => println!("  {:>2}. {}", word.number, word.text),
    }
}

fn run_patterns() {
    for pattern in pentacross_core::patterns::PATTERN_LIBRARY {
        println!("{}", pattern.name);
    }
}
