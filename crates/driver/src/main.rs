use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use transpile::{parse_source, Lang, Transpiler};

#[derive(Parser, Debug)]
#[command(
    name = "xlate",
    about = "Four-way source-to-source translator",
    long_about = "Translates small programs among a scripting language, C, C++, and Java through a shared intermediate representation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lex a source file and print its tokens
    Tokens {
        /// Input source file
        input: PathBuf,
        /// Source language tag (inferred from the file extension when omitted)
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Parse a source file and print the IR (debug format)
    Ast {
        /// Input source file
        input: PathBuf,
        /// Source language tag (inferred from the file extension when omitted)
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Translate a source file into a single target language
    Emit {
        /// Input source file
        input: PathBuf,
        /// Source language tag (inferred from the file extension when omitted)
        #[arg(short, long)]
        lang: Option<String>,
        /// Target language tag
        #[arg(short, long)]
        to: String,
    },
    /// Run all four back-ends and print each output
    Transpile {
        /// Input source file
        input: PathBuf,
        /// Source language tag (inferred from the file extension when omitted)
        #[arg(short, long)]
        lang: Option<String>,
        /// Print the full result record as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Tokens { input, lang } => cmd_tokens(&input, lang.as_deref()),
        Commands::Ast { input, lang } => cmd_ast(&input, lang.as_deref()),
        Commands::Emit { input, lang, to } => cmd_emit(&input, lang.as_deref(), &to),
        Commands::Transpile { input, lang, json } => cmd_transpile(&input, lang.as_deref(), json),
    }
}

fn read_source(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn resolve_lang(input: &Path, tag: Option<&str>) -> Result<Lang> {
    if let Some(tag) = tag {
        return Lang::from_tag(tag)
            .ok_or_else(|| anyhow!("unknown language tag `{tag}`"));
    }
    input
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Lang::from_extension)
        .ok_or_else(|| {
            anyhow!(
                "cannot infer language of {}; pass --lang {{scripting|c-family|cpp-family|class-based}}",
                input.display()
            )
        })
}

fn cmd_tokens(input: &Path, tag: Option<&str>) -> Result<()> {
    let lang = resolve_lang(input, tag)?;
    let src = read_source(input)?;
    let toks = match lang {
        Lang::Scripting => lex::python::lex(&src),
        Lang::CFamily => lex::c::lex(&src),
        Lang::CppFamily => lex::cpp::lex(&src),
        Lang::ClassBased => lex::java::lex(&src),
    };
    for tok in toks {
        println!("{:?} {:?}", tok.kind, tok.text);
    }
    Ok(())
}

fn cmd_ast(input: &Path, tag: Option<&str>) -> Result<()> {
    let lang = resolve_lang(input, tag)?;
    let src = read_source(input)?;
    let prog = parse_source(&src, lang);
    println!("{prog:#?}");
    Ok(())
}

fn cmd_emit(input: &Path, tag: Option<&str>, to: &str) -> Result<()> {
    let lang = resolve_lang(input, tag)?;
    let target = Lang::from_tag(to).ok_or_else(|| anyhow!("unknown target tag `{to}`"))?;
    let src = read_source(input)?;
    let result = Transpiler::new().transpile(&src, lang);
    match result.get(target) {
        Some(text) => {
            print!("{text}");
            Ok(())
        }
        None => Err(anyhow!(
            "emission failed: {}",
            result.errors.join("; ")
        )),
    }
}

fn cmd_transpile(input: &Path, tag: Option<&str>, json: bool) -> Result<()> {
    let lang = resolve_lang(input, tag)?;
    let src = read_source(input)?;
    let result = Transpiler::new().transpile(&src, lang);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for target in Lang::ALL {
            if let Some(text) = result.get(target) {
                println!("==== {} ====", target.display_name());
                println!("{text}");
            }
        }
        for err in &result.errors {
            eprintln!("error: {err}");
        }
    }
    if !result.success {
        return Err(anyhow!("{} target(s) failed", result.errors.len()));
    }
    Ok(())
}
