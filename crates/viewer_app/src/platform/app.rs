use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use url::Url;
use viewer_core::{update, AppState, Msg};
use viewer_engine::DocumentWriter;
use viewer_logging::{viewer_debug, viewer_error, viewer_info, viewer_warn};

use super::cli::Cli;
use super::config::ViewerConfig;
use super::effects::{EffectRunner, Navigation};
use super::logging::{self, LogDestination};
use super::ui;

/// Everything the main loop reacts to, applied strictly one at a time.
#[derive(Debug)]
pub(crate) enum AppInput {
    Msg(Msg),
    ShowHistory,
    /// Explicit `quit`: leave at once, even with a lookup in flight.
    Quit,
    /// Stdin reached end of file: leave once no lookup is in flight.
    InputClosed,
}

/// How the main loop ended.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LoopExit {
    Ended,
    Navigated { url: String },
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = ViewerConfig::resolve(&cli).context("loading configuration")?;
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::initialize(
        LogDestination::from_log_file(config.log_file.as_deref()),
        level,
    );
    match config.to_ron() {
        Ok(text) => viewer_debug!("effective configuration:\n{}", text),
        Err(err) => viewer_warn!("could not serialize configuration: {}", err),
    }

    let start_url = Url::parse(cli.start_url.trim())
        .with_context(|| format!("invalid start URL {:?}", cli.start_url))?;
    viewer_info!(
        "starting at {} (endpoint {}, output {:?})",
        start_url,
        config.endpoint,
        config.output_path
    );

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let mut runner = EffectRunner::new(config.fetch_settings(), start_url.as_str(), input_tx.clone())
        .context("starting lookup engine")?;
    let writer = DocumentWriter::new(config.output_path.clone());

    // Loaded is queued ahead of anything stdin can produce.
    let _ = input_tx.send(AppInput::Msg(Msg::Loaded));
    spawn_stdin_reader(input_tx);

    let state = AppState::new(start_url);
    if let LoopExit::Navigated { url } = run_loop(state, &input_rx, &mut runner, &writer) {
        println!("navigate {url}");
    }
    Ok(())
}

/// Applies inputs until `quit`, an external navigation, or stdin EOF with nothing in flight.
pub(crate) fn run_loop(
    mut state: AppState,
    inbox: &mpsc::Receiver<AppInput>,
    runner: &mut EffectRunner,
    writer: &DocumentWriter,
) -> LoopExit {
    write_if_dirty(&mut state, writer);
    let mut input_closed = false;

    while let Ok(input) = inbox.recv() {
        match input {
            AppInput::Msg(msg) => {
                viewer_debug!("msg {:?}", msg);
                let (next, effects) = update(state, msg);
                state = next;

                if let Navigation::Leave { url } = runner.run(effects) {
                    return LoopExit::Navigated { url };
                }
                write_if_dirty(&mut state, writer);
            }
            AppInput::ShowHistory => {
                for (index, entry) in runner.history().entries().iter().enumerate() {
                    println!("{index:>3} {entry}");
                }
            }
            AppInput::Quit => break,
            AppInput::InputClosed => {
                input_closed = true;
                if let Some(request_id) = state.in_flight() {
                    viewer_info!("input closed; waiting for request_id={}", request_id);
                }
            }
        }
        if input_closed && state.in_flight().is_none() {
            break;
        }
    }

    viewer_info!(
        "session ended at {} ({} history entries, last pushed {:?})",
        state.url(),
        runner.history().entries().len(),
        runner.history().current()
    );
    LoopExit::Ended
}

fn write_if_dirty(state: &mut AppState, writer: &DocumentWriter) {
    if !state.consume_dirty() {
        return;
    }
    let html = match ui::render::render_document(&state.view()) {
        Ok(html) => html,
        Err(err) => {
            viewer_error!("failed to render page: {}", err);
            return;
        }
    };
    match writer.write(&html) {
        Ok(()) => viewer_info!("rendered {} to {:?}", state.url(), writer.target()),
        Err(err) => viewer_error!("failed to write {:?}: {}", writer.target(), err),
    }
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(input) = parse_command(&line) else {
                if !line.trim().is_empty() {
                    eprintln!("unknown command: {}", line.trim());
                }
                continue;
            };
            let quit = matches!(input, AppInput::Quit);
            if tx.send(input).is_err() || quit {
                return;
            }
        }
        let _ = tx.send(AppInput::InputClosed);
    });
}

fn parse_command(line: &str) -> Option<AppInput> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    match (command, arg) {
        ("open", href) if !href.is_empty() => Some(AppInput::Msg(Msg::LinkClicked {
            href: href.to_string(),
        })),
        ("goto", url) if !url.is_empty() => Some(AppInput::Msg(Msg::UrlChanged(url.to_string()))),
        ("refresh", "") => Some(AppInput::Msg(Msg::FetchRequested)),
        ("history", "") => Some(AppInput::ShowHistory),
        ("quit", "") | ("exit", "") => Some(AppInput::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;

    use tempfile::TempDir;
    use viewer_engine::{ArtifactFetcher, ArtifactRecord, FetchError, LookupParams};

    const COMPLETE: &str =
        "https://viewer.test/?pkg=numpy&channel=conda-forge&arch=linux-64&name=numpy-1.24.0";

    /// Answers every lookup with numpy after `delay`, or never when `delay` is `None`.
    struct StubFetcher {
        delay: Option<Duration>,
    }

    #[async_trait::async_trait]
    impl ArtifactFetcher for StubFetcher {
        async fn fetch_artifact(&self, _params: &LookupParams) -> Result<ArtifactRecord, FetchError> {
            match self.delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => std::future::pending::<()>().await,
            }
            Ok(viewer_engine::decode_artifact(
                br#"{"name":"numpy","version":"1.24.0","spec":{"path":"/pkgs/numpy-1.24.0.tar.bz2"}}"#,
            )
            .unwrap())
        }
    }

    struct Harness {
        _temp: TempDir,
        tx: mpsc::Sender<AppInput>,
        rx: mpsc::Receiver<AppInput>,
        runner: EffectRunner,
        writer: DocumentWriter,
    }

    impl Harness {
        fn new(delay: Option<Duration>) -> Self {
            let temp = TempDir::new().unwrap();
            let (tx, rx) = mpsc::channel();
            let runner =
                EffectRunner::with_fetcher(Arc::new(StubFetcher { delay }), COMPLETE, tx.clone())
                    .unwrap();
            let writer = DocumentWriter::new(temp.path().join("artifact.html"));
            Self {
                _temp: temp,
                tx,
                rx,
                runner,
                writer,
            }
        }

        fn run(&mut self, start: &str, inputs: Vec<AppInput>) -> (LoopExit, String) {
            for input in inputs {
                self.tx.send(input).unwrap();
            }
            let state = AppState::new(Url::parse(start).unwrap());
            let exit = run_loop(state, &self.rx, &mut self.runner, &self.writer);
            let html = fs::read_to_string(self.writer.target()).unwrap();
            (exit, html)
        }
    }

    #[test]
    fn resolved_lookup_is_written_to_the_document() {
        let mut harness = Harness::new(Some(Duration::from_millis(10)));

        let (exit, html) = harness.run(
            COMPLETE,
            vec![AppInput::Msg(Msg::Loaded), AppInput::InputClosed],
        );

        assert_eq!(exit, LoopExit::Ended);
        assert!(html.contains("numpy v1.24.0"));
        assert!(html.contains("numpy-1.24.0.tar.bz2"));
    }

    #[test]
    fn closed_input_waits_for_the_lookup_in_flight() {
        let mut harness = Harness::new(Some(Duration::from_millis(300)));

        let (exit, html) = harness.run(
            COMPLETE,
            vec![AppInput::Msg(Msg::Loaded), AppInput::InputClosed],
        );

        assert_eq!(exit, LoopExit::Ended);
        assert!(html.contains("<h2>numpy v1.24.0</h2>"));
    }

    #[test]
    fn closed_input_without_lookup_ends_at_once() {
        let mut harness = Harness::new(None);

        let (exit, html) = harness.run(
            "https://viewer.test/?pkg=numpy",
            vec![AppInput::Msg(Msg::Loaded), AppInput::InputClosed],
        );

        assert_eq!(exit, LoopExit::Ended);
        assert!(!html.contains("<section"));
    }

    #[test]
    fn quit_leaves_even_with_a_lookup_in_flight() {
        let mut harness = Harness::new(None);

        let (exit, html) = harness.run(COMPLETE, vec![AppInput::Msg(Msg::Loaded), AppInput::Quit]);

        assert_eq!(exit, LoopExit::Ended);
        assert!(!html.contains("<section"));
    }

    #[test]
    fn external_link_ends_the_loop() {
        let mut harness = Harness::new(None);

        let (exit, _html) = harness.run(
            "https://viewer.test/",
            vec![AppInput::Msg(Msg::LinkClicked {
                href: "https://conda-forge.org/".into(),
            })],
        );

        assert_eq!(
            exit,
            LoopExit::Navigated {
                url: "https://conda-forge.org/".into()
            }
        );
    }

    fn msg(line: &str) -> Option<Msg> {
        match parse_command(line)? {
            AppInput::Msg(msg) => Some(msg),
            _ => None,
        }
    }

    #[test]
    fn open_becomes_link_click() {
        assert_eq!(
            msg("open  /?pkg=numpy "),
            Some(Msg::LinkClicked {
                href: "/?pkg=numpy".into()
            })
        );
    }

    #[test]
    fn goto_becomes_url_change() {
        assert_eq!(
            msg("goto https://viewer.test/?pkg=a"),
            Some(Msg::UrlChanged("https://viewer.test/?pkg=a".into()))
        );
    }

    #[test]
    fn bare_commands() {
        assert_eq!(msg("refresh"), Some(Msg::FetchRequested));
        assert!(matches!(parse_command("history"), Some(AppInput::ShowHistory)));
        assert!(matches!(parse_command(" quit "), Some(AppInput::Quit)));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert!(parse_command("open").is_none());
        assert!(parse_command("refresh now").is_none());
        assert!(parse_command("jump x").is_none());
        assert!(parse_command("").is_none());
    }
}
