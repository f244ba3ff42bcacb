use std::{
    env, fs,
    io::{self, Read},
    process,
};

use dotenv::dotenv;
use serde::Serialize;
use wikiparse::wikitext::{List, QueryType, Section, Table, Template, WtError};

/// Env var selecting the output format (`tree` or `json`).
pub const FORMAT_VAR: &str = "WIKIPARSE_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Tree,
    Json,
}

impl OutputFormat {
    fn from_env() -> Self {
        match env::var(FORMAT_VAR) {
            Ok(v) if v.eq_ignore_ascii_case("json") => OutputFormat::Json,
            Ok(v) if !v.eq_ignore_ascii_case("tree") => {
                log::warn!("unknown {} value {:?}, using tree", FORMAT_VAR, v);
                OutputFormat::Tree
            }
            _ => OutputFormat::Tree,
        }
    }
}

/// Command line: `[--json|--tree] [--find NAME [--query TYPE]] [PATH|-]`.
#[derive(Debug)]
struct Args {
    format: OutputFormat,
    path: Option<String>,
    find: Option<String>,
    query: QueryType,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I, format: OutputFormat) -> Result<Self, WtError> {
        let mut parsed = Args {
            format,
            path: None,
            find: None,
            query: QueryType::Exact,
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => parsed.format = OutputFormat::Json,
                "--tree" => parsed.format = OutputFormat::Tree,
                "--find" => parsed.find = Some(flag_value(&mut args, "--find")?),
                "--query" => {
                    parsed.query = flag_value(&mut args, "--query")?
                        .parse()
                        .map_err(WtError::invalid_arg)?;
                }
                _ => parsed.path = Some(arg),
            }
        }
        Ok(parsed)
    }
}

fn flag_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, WtError> {
    args.next()
        .ok_or_else(|| WtError::invalid_arg(format!("{} needs a value", flag)))
}

#[derive(Serialize)]
struct Dump<'a> {
    infobox: Option<&'a Template>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<Vec<&'a Template>>,
    templates: &'a [Template],
    tables: &'a [Table],
    lists: &'a [List],
    sections: &'a Section,
}

/// Read the page body from `path`, or stdin when it is `None` or `-`.
fn read_input(path: Option<&str>) -> Result<String, WtError> {
    match path {
        Some(p) if p != "-" => fs::read_to_string(p)
            .map_err(|e| WtError::io_err(format!("failed to read {:?}", p), e)),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_tree(root: &Section, matches: Option<&[&Template]>) {
    print!("{}", root.tree());
    println!(
        "-- {} templates, {} tables, {} lists, {} links",
        root.templates().len(),
        root.tables().len(),
        root.lists().len(),
        root.links().len()
    );
    if let Some(infobox) = root.infobox() {
        println!("-- {}", infobox.name);
        for (name, value) in &infobox.named_params {
            println!("   {} = {}", name, value.text().unwrap_or_default());
        }
    }
    if let Some(matches) = matches {
        println!("-- {} matching templates", matches.len());
        for template in matches {
            println!("   {}", template);
        }
    }
}

fn run() -> Result<(), WtError> {
    let args = Args::parse(env::args().skip(1), OutputFormat::from_env())?;

    let text = read_input(args.path.as_deref())?;
    log::info!("parsing {} bytes", text.len());
    let root = Section::parse(&text);

    let matches = args.find.as_deref().map(|name| {
        log::info!("searching templates: {} {:?}", args.query, name);
        root.find_templates(name, args.query)
    });

    match args.format {
        OutputFormat::Tree => print_tree(&root, matches.as_deref()),
        OutputFormat::Json => {
            let dump = Dump {
                infobox: root.infobox(),
                matches,
                templates: root.templates(),
                tables: root.tables(),
                lists: root.lists(),
                sections: &root,
            };
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }
    Ok(())
}

fn main() {
    dotenv().ok();
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, WtError> {
        Args::parse(list.iter().map(|s| s.to_string()), OutputFormat::Tree)
    }

    #[test]
    fn flags_and_path() {
        let parsed = args(&["--json", "--find", "Infobox", "--query", "startswith", "page.txt"]).unwrap();
        assert_eq!(parsed.format, OutputFormat::Json);
        assert_eq!(parsed.find.as_deref(), Some("Infobox"));
        assert_eq!(parsed.query, QueryType::StartsWith);
        assert_eq!(parsed.path.as_deref(), Some("page.txt"));
    }

    #[test]
    fn defaults_to_exact_query_and_stdin() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.query, QueryType::Exact);
        assert!(parsed.path.is_none());
        assert!(parsed.find.is_none());
    }

    #[test]
    fn bad_query_or_missing_value_is_invalid_argument() {
        assert_eq!(args(&["--query", "fuzzy"]).unwrap_err().kind(), "InvalidArgument");
        assert_eq!(args(&["--find"]).unwrap_err().kind(), "InvalidArgument");
    }
}
