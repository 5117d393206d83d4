//! Interactive demo host.
//!
//! Mounts a widget and drives it from stdin on a single-threaded tokio
//! loop. Plain lines are typed into the composer and sent; slash commands
//! map onto the widget's runtime API. Timers run in real time: the loop
//! sleeps until the next one is due and advances the widget by the
//! wall-clock time that passed.

use anyhow::{Context, Result, bail};
use chatiq_config::Theme;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use super::RuntimeOptions;
use super::commands::{load_config, open_store};
use crate::attachment::{DropEvent, FileDescriptor};
use crate::events::WidgetEvent;
use crate::sound::{SilentToneEmitter, SoundKind, default_emitter};
use crate::traits::ToneEmitter;
use crate::widget::ChatWidget;

/// How long to sleep when no timer is pending
const IDLE_POLL: Duration = Duration::from_secs(3600);

const HELP: &str = "\
Type a message and press Enter to send it. Commands:
  /open /close /toggle       panel lifecycle
  /theme [light|dark]        set or toggle the theme
  /system light|dark         OS colour-scheme change (theme: auto)
  /sound                     toggle sounds
  /play send|receive|notification
  /unread N                  set the unread badge
  /quick a | b | c           show quick replies
  /reply N|TEXT              pick a quick reply
  /simulate TEXT [| a | b]   inject a bot message (optional quick replies)
  /accent #RRGGBB            change the accent colour
  /attach PATH  /drop PATH   stage a file via picker or drag-and-drop
  /detach                    discard the staged file
  /emoji [FILTER]            toggle the picker or list matches
  /insert EMOJI              insert at the caret
  /start                     dismiss the welcome card
  /wait MS                   fast-forward timers
  /state  /help  /quit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Say(String),
    Open,
    Close,
    Toggle,
    Theme(Option<Theme>),
    System { dark: bool },
    Sound,
    Play(SoundKind),
    Unread(u32),
    Quick(Vec<String>),
    Reply(String),
    Simulate {
        text: String,
        quick_replies: Option<Vec<String>>,
    },
    Accent(String),
    Attach(PathBuf),
    Drop(PathBuf),
    Detach,
    Emoji(Option<String>),
    Insert(String),
    Start,
    Wait(u64),
    State,
    Help,
    Quit,
    Empty,
}

/// Split `a | b | c` into trimmed, non-empty parts
fn split_list(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn require<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(arg)
    }
}

/// Parse one line of input
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(ReplCommand::Empty);
    }
    let Some(command) = line.trim_start().strip_prefix('/') else {
        return Ok(ReplCommand::Say(line.to_string()));
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((command, ""));

    let command = match name {
        "open" => ReplCommand::Open,
        "close" => ReplCommand::Close,
        "toggle" => ReplCommand::Toggle,
        "theme" if arg.is_empty() => ReplCommand::Theme(None),
        "theme" => ReplCommand::Theme(Some(arg.parse()?)),
        "system" => match arg {
            "dark" => ReplCommand::System { dark: true },
            "light" => ReplCommand::System { dark: false },
            _ => return Err("usage: /system light|dark".to_string()),
        },
        "sound" => ReplCommand::Sound,
        "play" => ReplCommand::Play(require(arg, "/play send|receive|notification")?.parse()?),
        "unread" => ReplCommand::Unread(
            require(arg, "/unread N")?
                .parse()
                .map_err(|_| format!("not a count: '{arg}'"))?,
        ),
        "quick" => ReplCommand::Quick(split_list(arg)),
        "reply" => ReplCommand::Reply(require(arg, "/reply N|TEXT")?.to_string()),
        "simulate" => {
            let (text, replies) = match arg.split_once('|') {
                Some((text, rest)) => (text.trim(), Some(split_list(rest))),
                None => (arg, None),
            };
            ReplCommand::Simulate {
                text: require(text, "/simulate TEXT [| a | b]")?.to_string(),
                quick_replies: replies,
            }
        }
        "accent" => ReplCommand::Accent(require(arg, "/accent #RRGGBB")?.to_string()),
        "attach" => ReplCommand::Attach(PathBuf::from(require(arg, "/attach PATH")?)),
        "drop" => ReplCommand::Drop(PathBuf::from(require(arg, "/drop PATH")?)),
        "detach" => ReplCommand::Detach,
        "emoji" if arg.is_empty() => ReplCommand::Emoji(None),
        "emoji" => ReplCommand::Emoji(Some(arg.to_string())),
        "insert" => ReplCommand::Insert(require(arg, "/insert EMOJI")?.to_string()),
        "start" => ReplCommand::Start,
        "wait" => ReplCommand::Wait(
            require(arg, "/wait MS")?
                .parse()
                .map_err(|_| format!("not a duration in ms: '{arg}'"))?,
        ),
        "state" => ReplCommand::State,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("unknown command '/{other}' (try /help)")),
    };
    Ok(command)
}

/// Best-effort MIME type from a file extension
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn read_file(path: &Path) -> Result<FileDescriptor> {
    let contents =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileDescriptor::new(name, guess_mime_type(path), contents))
}

/// Whether the loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply a command to the widget. Errors are reported to the user and do
/// not end the session.
pub fn apply(widget: &mut ChatWidget, command: ReplCommand) -> Result<Flow> {
    match command {
        ReplCommand::Empty => {}
        ReplCommand::Say(text) => {
            widget.set_composer_text(&text);
            widget.send();
        }
        ReplCommand::Open => widget.open(),
        ReplCommand::Close => widget.close(),
        ReplCommand::Toggle => widget.toggle(),
        ReplCommand::Theme(Some(theme)) => widget.set_theme(theme),
        ReplCommand::Theme(None) => {
            widget.toggle_theme();
        }
        ReplCommand::System { dark } => {
            if !widget.system_theme_changed(dark) {
                println!("(ignored: configured theme is not auto)");
            }
        }
        ReplCommand::Sound => {
            widget.toggle_sound();
        }
        ReplCommand::Play(kind) => {
            widget.play_sound(kind);
        }
        ReplCommand::Unread(count) => widget.set_unread_count(count),
        ReplCommand::Quick(replies) => widget.show_quick_replies(replies),
        ReplCommand::Reply(choice) => {
            let text = match (choice.parse::<usize>(), widget.quick_replies()) {
                (Ok(n), Some(active)) if (1..=active.len()).contains(&n) => active[n - 1].clone(),
                _ => choice,
            };
            widget.select_quick_reply(&text);
        }
        ReplCommand::Simulate {
            text,
            quick_replies,
        } => widget.simulate_message(&text, quick_replies),
        ReplCommand::Accent(hex) => {
            widget.set_accent_color(&hex)?;
        }
        ReplCommand::Attach(path) => {
            let file = read_file(&path)?;
            widget.stage_file(&file)?;
        }
        ReplCommand::Drop(path) => {
            let file = read_file(&path)?;
            widget.handle_drop_event(DropEvent::Enter)?;
            widget.handle_drop_event(DropEvent::Over)?;
            widget.handle_drop_event(DropEvent::Drop(vec![file]))?;
        }
        ReplCommand::Detach => widget.clear_attachment(),
        ReplCommand::Emoji(None) => {
            widget.toggle_emoji_picker();
        }
        ReplCommand::Emoji(Some(filter)) => {
            let matches = widget.set_emoji_filter(&filter);
            println!("{}", matches.join(" "));
        }
        ReplCommand::Insert(emoji) => widget.insert_emoji(&emoji),
        ReplCommand::Start => widget.start(),
        ReplCommand::Wait(ms) => {
            widget.advance(Duration::from_millis(ms));
        }
        ReplCommand::State => print_state(widget),
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_state(widget: &ChatWidget) {
    let badge = widget.badge();
    println!("site:       {}", widget.site_id());
    println!("visitor:    {}", widget.visitor_id());
    println!("panel:      {}", widget.panel_state().as_str());
    println!(
        "badge:      {}{}",
        badge.text.as_deref().unwrap_or("-"),
        if badge.pulse { " (pulsing)" } else { "" }
    );
    println!("typing:     {}", widget.is_typing());
    println!("messages:   {}", widget.messages().len());
    println!("theme:      {}", widget.theme());
    println!("accent:     {}", widget.accent().base.to_hex());
    println!("sound:      {}", if widget.sound_enabled() { "on" } else { "off" });
    println!(
        "attachment: {}",
        widget
            .staged_attachment()
            .map(|a| format!("{} ({})", a.name, a.size_label))
            .unwrap_or_else(|| "-".to_string())
    );
    println!("draft:      {:?}", widget.draft());
    println!("timers:     {}", widget.pending_timers());
    if let Some(error) = widget.storage_error() {
        let mode = if widget.storage_degraded() {
            "memory only"
        } else {
            "read errors"
        };
        println!("storage:    {mode} ({error})");
    }
}

/// One-line text rendering of an event
pub fn describe_event(event: &WidgetEvent, agent_name: &str) -> String {
    match event {
        WidgetEvent::Mounted {
            version,
            site_id,
            visitor_id,
        } => format!("ChatIQ v{version} ready (site {site_id}, visitor {visitor_id})"),
        WidgetEvent::PanelStateChanged { state } => format!("[panel] {}", state.as_str()),
        WidgetEvent::BadgeChanged { badge } => match &badge.text {
            Some(text) if badge.pulse => format!("[badge] {text} (pulsing)"),
            Some(text) => format!("[badge] {text}"),
            None => "[badge] hidden".to_string(),
        },
        WidgetEvent::TypingChanged { typing: true } => format!("{agent_name} is typing..."),
        WidgetEvent::TypingChanged { typing: false } => "[typing] stopped".to_string(),
        WidgetEvent::MessageAppended { entry } => {
            let who = match entry.from {
                crate::conversation::Sender::User => "You",
                crate::conversation::Sender::Bot => agent_name,
            };
            let attachment = entry
                .attachment
                .as_ref()
                .map(|a| format!(" [{} {}]", a.name, a.size_label))
                .unwrap_or_default();
            format!("{} {}: {}{}", entry.display_time(), who, entry.text, attachment)
        }
        WidgetEvent::QuickRepliesShown { replies } => replies
            .iter()
            .enumerate()
            .map(|(i, r)| format!("  ({}) {}", i + 1, r))
            .collect::<Vec<_>>()
            .join("\n"),
        WidgetEvent::QuickRepliesCleared => "[quick replies] cleared".to_string(),
        WidgetEvent::ThemeChanged { theme } => format!("[theme] {theme}"),
        WidgetEvent::AccentChanged { variables } => format!(
            "[accent] {}",
            variables
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ")
        ),
        WidgetEvent::SoundToggled { enabled } => {
            format!("[sound] {}", if *enabled { "on" } else { "off" })
        }
        WidgetEvent::SoundPlayed { kind } => format!("[sound] {}", kind.as_str()),
        WidgetEvent::DropOverlayChanged { visible } => {
            format!("[drop] {}", if *visible { "drop files here" } else { "hidden" })
        }
        WidgetEvent::AttachmentStaged { attachment } => {
            format!("[attachment] {} ({})", attachment.name, attachment.size_label)
        }
        WidgetEvent::AttachmentCleared => "[attachment] cleared".to_string(),
        WidgetEvent::Alert { message } => format!("!! {message}"),
        WidgetEvent::EmojiPickerChanged { visible } => {
            format!("[emoji] {}", if *visible { "open" } else { "closed" })
        }
        WidgetEvent::ComposerChanged { text, can_send } => {
            format!("[composer] {text:?}{}", if *can_send { "" } else { " (send disabled)" })
        }
        WidgetEvent::ScrollToLatest { .. } => String::new(),
        WidgetEvent::WelcomeDismissed => "[welcome] dismissed".to_string(),
        WidgetEvent::TornDown => "[chatiq] torn down".to_string(),
    }
}

struct Printer {
    json: bool,
    agent_name: String,
}

impl Printer {
    fn flush(&self, widget: &mut ChatWidget) -> Result<()> {
        for event in widget.drain_events() {
            if self.json {
                println!("{}", event.to_json().context("failed to encode event")?);
            } else {
                let line = describe_event(&event, &self.agent_name);
                if !line.is_empty() {
                    println!("{line}");
                }
            }
        }
        Ok(())
    }
}

/// Mount a widget and run the interactive loop until EOF or `/quit`
pub async fn run(options: RuntimeOptions) -> Result<()> {
    let config = load_config(&options)?;
    if config.site_id().is_none() {
        bail!("no site id: pass --site-id or set site_id in the config file");
    }

    let store = open_store(&options);
    let emitter: Box<dyn ToneEmitter> = if options.mute {
        Box::new(SilentToneEmitter)
    } else {
        default_emitter()
    };

    let printer = Printer {
        json: options.json,
        agent_name: config.agent_name.clone(),
    };
    let mut widget = ChatWidget::mount(config, store, emitter, options.system_dark)
        .context("failed to mount widget")?;
    printer.flush(&mut widget)?;
    if !options.json {
        println!("Type /help for commands.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_tick = Instant::now();

    loop {
        let sleep_for = widget.next_timer_in().unwrap_or(IDLE_POLL);

        let line = tokio::select! {
            line = lines.next_line() => Some(line.context("failed to read stdin")?),
            _ = tokio::time::sleep(sleep_for) => None,
        };

        // Catch timers up to wall-clock time before applying input
        let now = Instant::now();
        widget.advance(now.duration_since(last_tick));
        last_tick = now;

        match line {
            Some(None) => break,
            Some(Some(line)) => match parse_command(&line) {
                Ok(command) => match apply(&mut widget, command) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("error: {e:#}"),
                },
                Err(message) => eprintln!("{message}"),
            },
            None => {}
        }
        printer.flush(&mut widget)?;
    }

    widget.shutdown();
    printer.flush(&mut widget)?;
    drop(widget.teardown());
    Ok(())
}
