//! Instafilter CLI - apply a single photo filter from the command line.

use anyhow::{bail, Context};
use instafilter::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or(instafilter::NAME);

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::SUCCESS;
    }

    let outcome = match args[1].as_str() {
        "list" => {
            list_filters();
            Ok(())
        }
        "info" => match args.get(2) {
            Some(identifier) => filter_info(identifier),
            None => Err(anyhow::anyhow!("Please specify a filter identifier")),
        },
        "apply" => {
            if args.len() < 3 {
                eprintln!(
                    "Usage: {} apply <input> [output] [--filter <id>] [--intensity <0..1>] [--config <file>]",
                    program
                );
                return ExitCode::FAILURE;
            }
            apply(&args[2..])
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!("Instafilter v{}", instafilter::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                  List the filters in the catalog");
    println!("  info <filter>         Show the parameters a filter declares");
    println!("  apply <in> [out]      Filter an image and save the result");
    println!("  help                  Show this help message");
    println!();
    println!("Apply options:");
    println!("  --filter <id>         Filter to apply (default: from config)");
    println!("  --intensity <value>   Slider position 0.0 to 1.0 (default: from config)");
    println!("  --config <file>       Config file (default: ./{})", instafilter::config::CONFIG_FILENAME);
    println!();
    println!("Without an output path the result is numbered into the configured output_dir.");
}

fn list_filters() {
    let engine = CpuEngine::new();
    let grouped = engine.registry().grouped_by_category();

    println!("Available filters ({} total):", engine.registry().len());
    println!();

    for (category, kernels) in grouped {
        println!("  {}", category.display_name());
        for metadata in kernels {
            let identifier = FilterId::from_engine_name(&metadata.name)
                .map(|id| id.identifier())
                .unwrap_or("-");
            println!("      • {:<18} {} - {}", identifier, metadata.name, metadata.description);
        }
        println!();
    }
}

/// Attach the suggested fix, when there is one, to a catalog error.
fn with_fix(error: CatalogError) -> anyhow::Error {
    match error.suggested_fix() {
        Some(fix) => anyhow::anyhow!("{} ({})", error, fix),
        None => error.into(),
    }
}

fn parse_filter(identifier: &str) -> anyhow::Result<FilterId> {
    identifier.parse().map_err(with_fix)
}

fn unsupported(id: FilterId) -> anyhow::Error {
    with_fix(CatalogError::Unsupported {
        name: id.engine_name(),
    })
}

fn filter_info(identifier: &str) -> anyhow::Result<()> {
    let id = parse_filter(identifier)?;
    let engine = CpuEngine::new();
    let name = id.engine_name();
    let Some(metadata) = engine.registry().get_metadata(&name) else {
        return Err(unsupported(id));
    };

    println!("Filter: {}", metadata.display_name);
    println!("Identifier: {}", id);
    println!("Engine name: {}", metadata.name);
    println!("Category: {}", metadata.category.display_name());
    println!();
    if !metadata.description.is_empty() {
        println!("Description:");
        println!("  {}", metadata.description);
        println!();
    }

    println!("Parameters:");
    for param in &metadata.parameters {
        match &param.default_value {
            Some(default) => println!("  • {} [{}] = {}", param.role.key(), param.display_name, default),
            None => println!("  • {} [{}]", param.role.key(), param.display_name),
        }
        if !param.description.is_empty() {
            println!("    {}", param.description);
        }
        if let Some(constraint) = &param.constraint {
            println!("    constraint: {:?}", constraint);
        }
    }
    Ok(())
}

/// Remembers the last notification while logging everything.
struct CliPresenter {
    inner: LogPresenter,
    last: Rc<RefCell<Option<Notification>>>,
}

impl Presenter for CliPresenter {
    fn display(&mut self, image: &ImageValue) {
        self.inner.display(image);
    }

    fn show_overlay(&mut self) {
        self.inner.show_overlay();
    }

    fn hide_overlay(&mut self) {
        self.inner.hide_overlay();
    }

    fn notify(&mut self, notification: Notification) {
        self.inner.notify(notification.clone());
        *self.last.borrow_mut() = Some(notification);
    }
}

/// Arguments of the `apply` command.
#[derive(Debug, Default, PartialEq)]
struct ApplyArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    filter: Option<FilterId>,
    intensity: Option<f64>,
    config: Option<PathBuf>,
}

fn parse_apply_args(args: &[String]) -> anyhow::Result<ApplyArgs> {
    let Some(input) = args.first() else {
        bail!("Please specify an input image");
    };
    let mut parsed = ApplyArgs {
        input: PathBuf::from(input),
        ..ApplyArgs::default()
    };
    let options = match args.get(1) {
        Some(arg) if !arg.starts_with("--") => {
            parsed.output = Some(PathBuf::from(arg));
            &args[2..]
        }
        _ => &args[1..],
    };

    let mut i = 0;
    while i < options.len() {
        let flag = options[i].as_str();
        if !matches!(flag, "--filter" | "--intensity" | "--config") {
            eprintln!("Unknown option: {}", flag);
            i += 1;
            continue;
        }
        let Some(value) = options.get(i + 1) else {
            bail!("Option {} needs a value", flag);
        };

        match flag {
            "--filter" => parsed.filter = Some(parse_filter(value)?),
            "--intensity" => {
                let intensity: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid intensity '{}'", value))?;
                parsed.intensity = Some(intensity);
            }
            _ => parsed.config = Some(PathBuf::from(value)),
        }
        i += 2;
    }
    Ok(parsed)
}

fn apply(args: &[String]) -> anyhow::Result<()> {
    let ApplyArgs {
        input,
        output,
        filter,
        intensity,
        config: config_path,
    } = parse_apply_args(args)?;

    let config = match config_path {
        Some(path) => EditorConfig::load(&path)?,
        None => EditorConfig::discover(".")?,
    };
    let library = match &output {
        Some(path) => DirectoryLibrary::to_file(path),
        None => DirectoryLibrary::new(&config.output_dir),
    };

    let last = Rc::new(RefCell::new(None));
    let mut editor = Editor::from_config(
        &config,
        Arc::new(CpuEngine::new()),
        Box::new(FileImageSource::new(&input)),
        Box::new(library),
        Box::new(CliPresenter {
            inner: LogPresenter,
            last: last.clone(),
        }),
    );

    let sender = editor.sender();
    if let Some(id) = filter {
        sender.send(Intent::FilterSelected(id));
    }
    if let Some(value) = intensity {
        sender.send(Intent::IntensityChanged(value));
    }
    sender.send(Intent::PickRequested);
    editor.run_pending();

    let wanted = filter.unwrap_or(config.default_filter);
    if editor.session().filter_id() != Some(wanted) {
        return Err(unsupported(wanted));
    }
    if editor.session().source().is_none() {
        bail!("Could not load {}", input.display());
    }

    log::info!("Applying {} at intensity {}", wanted, editor.session().intensity());
    sender.send(Intent::SaveRequested);
    editor.run_pending();

    let outcome = last.borrow_mut().take();
    match outcome {
        Some(notification) if notification == Notification::saved() => {
            if let Some(path) = &output {
                println!("Saved {}", path.display());
            }
            Ok(())
        }
        Some(notification) => bail!("{}", notification),
        None => bail!("Nothing was saved"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_apply_args() {
        let parsed = parse_apply_args(&args(&[
            "in.jpg",
            "out.png",
            "--filter",
            "sepia_tone",
            "--intensity",
            "0.3",
        ]))
        .unwrap();

        assert_eq!(parsed.input, PathBuf::from("in.jpg"));
        assert_eq!(parsed.output, Some(PathBuf::from("out.png")));
        assert_eq!(parsed.filter, Some(FilterId::SepiaTone));
        assert_eq!(parsed.intensity, Some(0.3));
        assert_eq!(parsed.config, None);

        let parsed = parse_apply_args(&args(&["in.jpg", "--config", "my.toml"])).unwrap();
        assert_eq!(parsed.output, None);
        assert_eq!(parsed.config, Some(PathBuf::from("my.toml")));
    }

    #[test]
    fn test_flag_without_value_is_rejected() {
        for flag in ["--filter", "--intensity", "--config"] {
            let err = parse_apply_args(&args(&["in.jpg", "out.png", flag])).unwrap_err();
            assert!(err.to_string().contains(flag));
        }
    }

    #[test]
    fn test_unknown_filter_suggests_list() {
        let err = parse_apply_args(&args(&["in.jpg", "--filter", "colorInvert"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("colorInvert"));
        assert!(message.contains("Run 'list'"));
    }
}
