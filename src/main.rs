use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use codesim::report::Report;
use codesim::{compare, linearize, parse, read_source, tokenize_with, Config, Error, LexOptions};

/// 比较两份 C 风格源码的结构相似度。
#[derive(Parser, Debug)]
#[command(name = "codesim", version, about)]
struct Cli {
    /// 第一份源码
    file_a: PathBuf,
    /// 第二份源码
    file_b: PathBuf,

    /// JSON 配置文件（词法选项、判定阈值）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 打印两份源码的扁平序列
    #[arg(long)]
    show_sequence: bool,

    /// 打印两份源码的结构树
    #[arg(long)]
    dump_ast: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,

    /// 输出 debug 日志（也可以用 RUST_LOG 控制）
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                process::exit(e.exit_code());
            }
        },
        None => Config::default(),
    };

    let seq_a = match process_file(&cli.file_a, config.lex, &cli) {
        Ok(Some(seq)) => seq,
        Ok(None) => nothing_to_compare(&cli.file_a),
        Err(e) => fail(e),
    };
    let seq_b = match process_file(&cli.file_b, config.lex, &cli) {
        Ok(Some(seq)) => seq,
        Ok(None) => nothing_to_compare(&cli.file_b),
        Err(e) => fail(e),
    };

    let result = compare(&seq_a, &seq_b);
    let verdict = result.verdict(&config.thresholds);
    let file_a = cli.file_a.display().to_string();
    let file_b = cli.file_b.display().to_string();

    if cli.json {
        let report = Report {
            file_a: &file_a,
            file_b: &file_b,
            comparison: result,
            verdict,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!("A: {file_a}");
    println!("B: {file_b}");
    println!("sequence length: A={}, B={}", result.len_a, result.len_b);
    println!("edit distance:   {}", result.distance);
    println!("similarity:      {:.2}%", result.percent());
    println!("verdict:         {verdict}");
}

/// 读文件并计算扁平序列。源码里没有任何 token 时返回 `None`。
fn process_file(path: &Path, options: LexOptions, cli: &Cli) -> Result<Option<Vec<String>>, Error> {
    let src = read_source(path)?;
    info!(file = %path.display(), bytes = src.len(), "read source");

    let tokens = tokenize_with(&src, options)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let tree = parse(&tokens)?;
    drop(tokens);

    if cli.dump_ast {
        println!("== AST: {} ==", path.display());
        print!("{tree}");
    }

    let seq = linearize(&tree)?;
    if cli.show_sequence {
        println!("== sequence: {} ==", path.display());
        println!("{}", seq.join(" "));
    }
    Ok(Some(seq))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn nothing_to_compare(path: &Path) -> ! {
    eprintln!("{}: no tokens, nothing to compare", path.display());
    process::exit(1);
}

fn fail(e: Error) -> ! {
    eprintln!("{e}");
    process::exit(e.exit_code());
}
