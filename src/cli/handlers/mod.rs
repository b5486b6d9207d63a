mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::SessionLock;
use crate::io::site_io::{self, SiteError};
use crate::io::state::{self, SessionState};
use crate::model::site::Site;
use crate::ops::history::NavEvent;
use crate::ops::navigator::{Activation, Navigator};
use crate::ops::search::{self, SearchOptions, SearchScope};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Flags shared by every command
struct Context {
    site_dir: Option<PathBuf>,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let site_dir = match cli.site_dir {
        Some(ref dir) => Some(
            std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        ),
        None => None,
    };
    let ctx = Context {
        site_dir,
        json: cli.json,
    };

    match cli.command {
        // Init is handled in main.rs before site discovery
        Commands::Init(args) => cmd_init(args),

        // Read commands
        Commands::Show => cmd_show(&ctx),
        Commands::Tree(args) => cmd_tree(&ctx, args),
        Commands::Search(args) => cmd_search(&ctx, args),

        // Navigation
        Commands::Open(args) => cmd_open(&ctx, args),
        Commands::Back => cmd_move(&ctx, Navigator::back),
        Commands::Forward => cmd_move(&ctx, Navigator::forward),
        Commands::Home => cmd_move(&ctx, Navigator::home),
        Commands::Crumb(args) => cmd_move(&ctx, |nav| nav.jump_to_breadcrumb(args.index)),

        Commands::Lang(args) => cmd_lang(&ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_site_cwd(ctx: &Context) -> Result<Site, SiteError> {
    let start = match &ctx.site_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let root = site_io::discover_site(&start)?;
    site_io::load_site(&root)
}

/// A loaded site with the saved session re-entered
struct Session {
    site: Site,
    nav: Navigator,
    saved: SessionState,
}

impl Session {
    fn open(ctx: &Context) -> Result<Self, SiteError> {
        Ok(Self::enter(load_site_cwd(ctx)?))
    }

    fn enter(site: Site) -> Self {
        let mut nav = Navigator::with_data(site.menu_data());
        let saved = state::read_session(&site.site_dir).unwrap_or_default();
        if nav.restore(&saved) {
            tracing::debug!(trail = ?nav.breadcrumbs(), "resumed session");
        }
        Session { site, nav, saved }
    }

    /// Session language if one was chosen, else the site default
    fn language(&self) -> &str {
        self.saved
            .language
            .as_deref()
            .unwrap_or(&self.site.config.app.default_language)
    }

    fn save(&self) -> Result<(), std::io::Error> {
        let session = self.nav.to_session(self.saved.language.clone());
        state::write_session(&self.site.site_dir, &session)
    }
}

/// Run `f` against the session with the site locked, then persist it.
fn with_session<T>(
    ctx: &Context,
    f: impl FnOnce(&mut Session) -> Result<T, Box<dyn std::error::Error>>,
) -> Result<(Session, T), Box<dyn std::error::Error>> {
    let site = load_site_cwd(ctx)?;
    let _lock = SessionLock::acquire_default(&site.site_dir)?;
    let mut session = Session::enter(site);

    let value = f(&mut session)?;
    session.save()?;
    Ok((session, value))
}

fn print_location(ctx: &Context, session: &Session) -> CmdResult {
    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&location_to_json(&session.nav))?
        );
    } else {
        print!("{}", format_location(&session.nav, &session.site.config.app.title));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &Context) -> CmdResult {
    let session = Session::open(ctx)?;
    print_location(ctx, &session)
}

fn cmd_tree(ctx: &Context, args: TreeArgs) -> CmdResult {
    let site = load_site_cwd(ctx)?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&site.tree)?);
    } else {
        print!("{}", format_tree(&site.tree.roots, args.depth));
    }
    Ok(())
}

fn cmd_search(ctx: &Context, args: SearchArgs) -> CmdResult {
    let session = Session::open(ctx)?;
    let options = SearchOptions {
        leaves_only: session.site.config.search.leaves_only,
    };
    let scope_node = session.nav.current();
    let result = search::search(&session.site.tree.roots, &args.query, scope_node, options);
    tracing::debug!(query = %args.query, hits = result.nodes().len(), "search");

    if matches!(result, search::MatchResult::Reset) {
        // An empty query shows the unfiltered level
        return print_location(ctx, &session);
    }

    if ctx.json {
        let scope = match scope_node {
            Some(node) => SearchScope::CurrentLevel {
                title: node.title.clone(),
            },
            None => SearchScope::Global,
        };
        let out = search_to_json(&args.query, scope, &result);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", format_hits(&args.query, &result));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Navigation commands
// ---------------------------------------------------------------------------

fn cmd_open(ctx: &Context, args: OpenArgs) -> CmdResult {
    let (session, activation) = with_session(ctx, |session| {
        let node = session
            .nav
            .find_entry(&args.title)
            .cloned()
            .ok_or_else(|| format!("no entry named \"{}\" here", args.title))?;
        Ok(session.nav.activate(&node)?)
    })?;

    match activation {
        Activation::OpenExternal(url) => {
            if args.launch {
                open::that(&url).map_err(|e| format!("could not open {}: {}", url, e))?;
            }
            if ctx.json {
                let out = ActivationJson::OpenExternal { url };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", url);
            }
        }
        Activation::Empty => {
            if ctx.json {
                let out = ActivationJson::Empty { title: args.title };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}: nothing to show", args.title);
            }
        }
        Activation::Navigated(_) | Activation::Ignored => {
            if ctx.json {
                let out = ActivationJson::Navigated {
                    location: location_to_json(&session.nav),
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", format_location(&session.nav, &session.site.config.app.title));
            }
        }
    }
    Ok(())
}

/// Back, forward, home and breadcrumb jumps all share this shape.
fn cmd_move(ctx: &Context, step: impl FnOnce(&mut Navigator) -> NavEvent) -> CmdResult {
    let (session, event) = with_session(ctx, |session| Ok(step(&mut session.nav)))?;
    if event == NavEvent::Ignored {
        tracing::debug!("navigation ignored, nothing to do");
    }
    print_location(ctx, &session)
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

fn cmd_lang(ctx: &Context, args: LangArgs) -> CmdResult {
    let session = match args.code {
        None => Session::open(ctx)?,
        Some(code) => {
            let code = code.trim().to_lowercase();
            if code.is_empty() {
                return Err("language code cannot be empty".into());
            }
            let (session, ()) = with_session(ctx, |session| {
                session.saved.language = Some(code.clone());
                if args.default {
                    let (_, mut doc) = config_io::read_config(&session.site.site_dir)?;
                    config_io::set_default_language(&mut doc, &code);
                    config_io::write_config(&session.site.site_dir, &doc)?;
                    session.site.config.app.default_language = code.clone();
                }
                Ok(())
            })?;
            session
        }
    };

    if ctx.json {
        let out = LanguageJson {
            language: session.language().to_string(),
            default_language: session.site.config.app.default_language.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", session.language());
    }
    Ok(())
}
