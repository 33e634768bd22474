mod demo;

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;

use quiz_core::Clock;
use store::{InMemoryStore, RestConfig, RestStore, Store};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingStoreUrl,
    MissingAnonKey,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingStoreUrl => {
                write!(f, "--store-url (or SKILLFORGE_STORE_URL) is required without --demo")
            }
            ArgsError::MissingAnonKey => {
                write!(f, "--anon-key (or SKILLFORGE_ANON_KEY) is required without --demo")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    store_url: Option<String>,
    anon_key: Option<String>,
    demo: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut store_url = std::env::var("SKILLFORGE_STORE_URL").ok();
        let mut anon_key = std::env::var("SKILLFORGE_ANON_KEY").ok();
        let mut demo = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--store-url" => store_url = Some(require_value(args, "--store-url")?),
                "--anon-key" => anon_key = Some(require_value(args, "--anon-key")?),
                "--demo" => demo = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            store_url,
            anon_key,
            demo,
        })
    }

    fn build_store(&self) -> Result<Store, ArgsError> {
        if self.demo {
            let mem = InMemoryStore::new();
            demo::seed_demo(&mem);
            return Ok(mem.store());
        }

        let store_url = self.store_url.clone().ok_or(ArgsError::MissingStoreUrl)?;
        let anon_key = self.anon_key.clone().ok_or(ArgsError::MissingAnonKey)?;
        Ok(RestStore::new(RestConfig::new(store_url, anon_key)).store())
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--store-url <url> --anon-key <key>] [--demo]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --store-url <url>   Hosted store base URL");
    eprintln!("  --anon-key <key>    Hosted store anonymous API key");
    eprintln!("  --demo              Run against a seeded in-memory store");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SKILLFORGE_STORE_URL, SKILLFORGE_ANON_KEY, RUST_LOG");
}

struct DesktopApp {
    store: Store,
    clock: Clock,
}

impl UiApp for DesktopApp {
    fn store(&self) -> Store {
        self.store.clone()
    }

    fn clock(&self) -> Clock {
        self.clock
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let store = parsed.build_store()?;
    if parsed.demo {
        tracing::info!("running against the seeded demo store");
    }

    let app = DesktopApp {
        store,
        clock: Clock::system(),
    };
    let context = build_app_context(&(Arc::new(app) as Arc<dyn UiApp>));

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("SkillForge")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
