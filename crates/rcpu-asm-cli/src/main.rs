use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

use rcpu_asm::expand::split_line;
use rcpu_asm::{fill, select_free, Architecture, Encoder, Word};

#[derive(Parser, Debug)]
#[command(author, version, about = "RCPU assembler backend CLI", long_about = None)]
struct Cli {
    /// Architecture table as JSON (default: built-in RCPU table)
    #[arg(long, value_name = "FILE", global = true)]
    arch: Option<PathBuf>,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode one instruction and print the word
    Encode {
        mnemonic: String,
        /// Operand tokens; trailing commas are ignored
        #[arg(value_name = "OPERAND", allow_hyphen_values = true)]
        operands: Vec<String>,
    },
    /// Encode a file with one instruction per line into little-endian words
    Assemble {
        /// Input assembly file
        #[arg(short, long)]
        input: PathBuf,
        /// Output binary file
        #[arg(short, long)]
        output: PathBuf,
        /// Write a JSON listing of line, source and word
        #[arg(long, value_name = "FILE")]
        listing: Option<PathBuf>,
    },
    /// Print the first register not among USED
    Scratch {
        #[arg(value_name = "USED")]
        used: Vec<String>,
    },
    /// Fill instruction templates with NAME=VALUE bindings
    Fill {
        #[arg(long = "template", value_name = "TEMPLATE", required = true)]
        templates: Vec<String>,
        #[arg(long = "bind", value_name = "NAME=VALUE", value_parser = parse_binding)]
        bindings: Vec<(String, String)>,
    },
    /// Dump the active architecture table as JSON
    Arch,
}

#[derive(Debug, Serialize)]
struct ListingEntry {
    line: usize,
    source: String,
    word: Word,
}

fn parse_binding(s: &str) -> Result<(String, String)> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got {s:?}"))?;
    anyhow::ensure!(!name.trim().is_empty(), "empty placeholder name in {s:?}");
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn load_arch(path: Option<&Path>) -> Result<Architecture> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            let arch = Architecture::from_json(&text).with_context(|| format!("loading {}", p.display()))?;
            info!(path = %p.display(), "loaded architecture table");
            Ok(arch)
        }
        None => Ok(Architecture::rcpu().clone()),
    }
}

/// Drops `;` comments and `#` comment lines.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(';') {
        Some(p) => &line[..p],
        None => line,
    }
}

fn assemble(enc: &Encoder<'_>, text: &str) -> Result<Vec<ListingEntry>> {
    let mut out = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let src = strip_comment(raw).trim();
        let Some((mnemonic, operands)) = split_line(src) else {
            continue;
        };
        let word = enc
            .encode_str(mnemonic, &operands)
            .with_context(|| format!("line {}: {}", i + 1, src))?;
        out.push(ListingEntry {
            line: i + 1,
            source: src.to_string(),
            word,
        });
    }
    Ok(out)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let arch = load_arch(cli.arch.as_deref())?;
    let enc = Encoder::new(&arch)?;

    match cli.cmd {
        Command::Encode { mnemonic, operands } => {
            let ops: Vec<&str> = operands
                .iter()
                .map(|o| o.trim_end_matches(','))
                .filter(|o| !o.is_empty())
                .collect();
            let word = enc.encode_str(&mnemonic, &ops)?;
            println!("{word:#06x} {word:016b}");
        }
        Command::Assemble {
            input,
            output,
            listing,
        } => {
            let text = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let entries = assemble(&enc, &text)?;
            let bin: Vec<u8> = entries.iter().flat_map(|e| e.word.to_le_bytes()).collect();
            fs::write(&output, &bin).with_context(|| format!("writing {}", output.display()))?;
            info!(words = entries.len(), output = %output.display(), "assembled");
            if let Some(path) = listing {
                fs::write(&path, serde_json::to_string_pretty(&entries)?)?;
            }
        }
        Command::Scratch { used } => match select_free(&arch, &used) {
            Some(reg) => println!("{reg}"),
            None => println!("no register available"),
        },
        Command::Fill {
            templates,
            bindings,
        } => {
            let map: HashMap<String, String> = bindings.into_iter().collect();
            for line in fill(&templates, &map)? {
                println!("{line}");
            }
        }
        Command::Arch => {
            println!("{}", serde_json::to_string_pretty(&arch)?);
        }
    }

    Ok(())
}
