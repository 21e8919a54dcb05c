// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

//! Mindgrove CLI entrypoint.
//!
//! By default this opens the interactive editor on a fresh unsaved document.
//! With `--api`, the document is fetched from (or created on) a remote store
//! and `s` saves back to it. `--serve` runs the persistence REST API instead
//! of the editor.

use std::error::Error;
use std::sync::Arc;

use mindgrove::model::{MapId, MindMap, OwnerId};
use mindgrove::store::{decode_record, CreateMapRequest, HttpStore, RemoteStore};

const DEFAULT_SERVE_ADDR: &str = "127.0.0.1:8787";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program}\n  {program} --demo\n  {program} --api <base-url> --map <id>\n  {program} --api <base-url> --new --owner <id>\n  {program} --serve [--addr <host:port>]\n\nWithout arguments the editor opens a fresh unsaved document.\n--demo opens a built-in demo document.\n--api points the editor at a persistence API; combine with --map to open an\nexisting document or with --new --owner to create one first.\n--serve runs the persistence REST API (default address {DEFAULT_SERVE_ADDR})."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    serve: bool,
    addr: Option<String>,
    demo: bool,
    api: Option<String>,
    owner: Option<String>,
    map: Option<String>,
    new: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--serve" => {
                if options.serve {
                    return Err(());
                }
                options.serve = true;
            }
            "--addr" => {
                if options.addr.is_some() {
                    return Err(());
                }
                options.addr = Some(args.next().ok_or(())?);
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--api" => {
                if options.api.is_some() {
                    return Err(());
                }
                options.api = Some(args.next().ok_or(())?);
            }
            "--owner" => {
                if options.owner.is_some() {
                    return Err(());
                }
                options.owner = Some(args.next().ok_or(())?);
            }
            "--map" => {
                if options.map.is_some() {
                    return Err(());
                }
                options.map = Some(args.next().ok_or(())?);
            }
            "--new" => {
                if options.new {
                    return Err(());
                }
                options.new = true;
            }
            _ => return Err(()),
        }
    }

    if options.serve
        && (options.demo
            || options.api.is_some()
            || options.owner.is_some()
            || options.map.is_some()
            || options.new)
    {
        return Err(());
    }
    if options.addr.is_some() && !options.serve {
        return Err(());
    }
    if options.demo && (options.api.is_some() || options.map.is_some() || options.new) {
        return Err(());
    }
    if options.map.is_some() && options.new {
        return Err(());
    }
    if options.api.is_some() && options.map.is_none() && !options.new {
        return Err(());
    }
    if (options.map.is_some() || options.new) && options.api.is_none() {
        return Err(());
    }
    if options.new && options.owner.is_none() {
        return Err(());
    }

    Ok(options)
}

fn run_serve(addr: &str) -> Result<(), Box<dyn Error>> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        mindgrove::api::serve(listener, Arc::new(mindgrove::api::ApiState::default())).await
    })?;
    Ok(())
}

fn run_editor_with_api(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let base_url = options.api.ok_or("--api is required")?;
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let store = Arc::new(HttpStore::new(base_url)?);

    let map = if let Some(raw_map_id) = options.map {
        let map_id = MapId::new(raw_map_id)?;
        let record = runtime.block_on(store.fetch(&map_id))?;
        decode_record(&record)?
    } else {
        let owner = OwnerId::new(options.owner.ok_or("--new requires --owner")?)?;
        let draft = MindMap::new(MapId::fresh(), "Untitled map");
        let record = runtime.block_on(store.create(&CreateMapRequest::from_map(&draft, &owner)))?;
        decode_record(&record)?
    };

    let handle = runtime.handle().clone();
    mindgrove::tui::run_with_store(map, store, handle)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "mindgrove".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.serve {
            let addr = options
                .addr
                .clone()
                .unwrap_or_else(|| DEFAULT_SERVE_ADDR.to_owned());
            return run_serve(&addr);
        }

        if options.demo {
            return mindgrove::tui::run();
        }

        if options.api.is_some() {
            return run_editor_with_api(options);
        }

        mindgrove::tui::run_with_map(MindMap::new(MapId::fresh(), "Untitled map"))
    })();

    if let Err(err) = result {
        eprintln!("mindgrove: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse(&["--demo"]).expect("parse options");
        assert!(options.demo);
        assert!(!options.serve);
    }

    #[test]
    fn parses_serve_with_addr() {
        let options = parse(&["--serve", "--addr", "0.0.0.0:9000"]).expect("parse options");
        assert!(options.serve);
        assert_eq!(options.addr.as_deref(), Some("0.0.0.0:9000"));
    }

    #[test]
    fn parses_api_with_existing_map() {
        let options =
            parse(&["--api", "http://localhost:8787", "--map", "m1"]).expect("parse options");
        assert_eq!(options.api.as_deref(), Some("http://localhost:8787"));
        assert_eq!(options.map.as_deref(), Some("m1"));
        assert!(!options.new);
    }

    #[test]
    fn parses_api_with_new_map() {
        let options = parse(&["--api", "http://localhost:8787", "--new", "--owner", "u1"])
            .expect("parse options");
        assert!(options.new);
        assert_eq!(options.owner.as_deref(), Some("u1"));
    }

    #[test]
    fn rejects_addr_without_serve() {
        parse(&["--addr", "0.0.0.0:9000"]).unwrap_err();
    }

    #[test]
    fn rejects_serve_combined_with_editor_flags() {
        parse(&["--serve", "--demo"]).unwrap_err();
        parse(&["--serve", "--api", "http://localhost:8787", "--map", "m1"]).unwrap_err();
    }

    #[test]
    fn rejects_map_and_new_together() {
        parse(&["--api", "x", "--map", "m1", "--new", "--owner", "u1"]).unwrap_err();
    }

    #[test]
    fn rejects_api_without_map_or_new() {
        parse(&["--api", "http://localhost:8787"]).unwrap_err();
    }

    #[test]
    fn rejects_map_without_api() {
        parse(&["--map", "m1"]).unwrap_err();
    }

    #[test]
    fn rejects_new_without_owner() {
        parse(&["--api", "x", "--new"]).unwrap_err();
    }

    #[test]
    fn rejects_demo_with_api() {
        parse(&["--demo", "--api", "x", "--map", "m1"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_and_duplicate_flags() {
        parse(&["--nope"]).unwrap_err();
        parse(&["--demo", "--demo"]).unwrap_err();
        parse(&["--api", "x", "--api", "y", "--map", "m1"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_flag_values() {
        parse(&["--api"]).unwrap_err();
        parse(&["--map"]).unwrap_err();
    }
}
