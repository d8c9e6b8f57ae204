//! Wayland layer-shell host for the panel.
//!
//! Owns the iced application loop and wires the background sources into the
//! single [`Panel`] dispatcher:
//! - clock timer (1 s) and fullscreen poll timer (200 ms)
//! - animation frames, only while a fade is running
//! - Hyprland event socket (early fullscreen re-evaluation, monitor changes)
//! - status notifier host (indicator items)

mod menus;
mod strip;

pub use menus::{MenuQueue, MenuRequest};
pub use strip::{Art, FrameSurface, StripLayers, StripView};

use anyhow::Context;
use futures::channel::mpsc::Sender;
use iced::{widget::canvas::Canvas, Element, Length, Subscription, Task};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use panel_applets::{ClockApplet, IndicatorRow};
use panel_config::{default_path, load as load_config, PanelConfig, Position};
use panel_core::{Alpha, Message as PanelMessage, Size};
use panel_ipc::{fetch_monitors, poll_fullscreen, HyprlandEvent, HyprlandIpc};
use panel_renderer::{Compositor, Panel, VisibilityController};
use panel_theme::{CosmicMeasure, Style};
use panel_tray::ThemeIconResolver;
use std::rc::Rc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A fullscreen poll may take this many poll periods before it is abandoned
/// and the next one is allowed to start.
const IPC_TIMEOUT_POLLS: u32 = 5;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the panel.  Returns only if startup fails or the event loop exits.
pub fn run() -> anyhow::Result<()> {
    let config = load_config(default_path()).context("loading panel.toml")?;
    let art = Art::load(&config.assets.background, &config.assets.shadow)
        .context("loading panel art")?;

    let height = config.panel.height;
    let layer_settings = LayerShellSettings {
        size: Some((0, height)), // width=0 + L|R anchor = full-width stretch
        exclusive_zone: config.panel.reserved_height as i32,
        anchor: position_to_anchor(config.panel.position),
        layer: Layer::Top,
        ..Default::default()
    };

    let boot = Boot { config, art };
    application(move || PanelApp::new(boot.clone()), PanelApp::namespace, PanelApp::update, PanelApp::view)
        .subscription(PanelApp::subscription)
        .style(PanelApp::style)
        .settings(Settings { layer_settings, ..Default::default() })
        .run()
        .context("layer-shell event loop failed")
}

fn position_to_anchor(pos: Position) -> Anchor {
    match pos {
        Position::Top => Anchor::Top | Anchor::Left | Anchor::Right,
        Position::Bottom => Anchor::Bottom | Anchor::Left | Anchor::Right,
    }
}

/// Everything loaded before the window exists.
#[derive(Debug, Clone)]
struct Boot {
    config: PanelConfig,
    art:    Art,
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
///
/// `#[to_layer_message]` injects layer-shell control variants that the
/// backend handles; they never reach `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    /// Routed to the panel dispatcher.
    App(PanelMessage),
    /// Time to evaluate the fullscreen condition.
    Poll,
    /// A fullscreen poll could not reach the compositor.
    PollFailed,
    /// Monitors were added or removed; refresh the strip width.
    MonitorsChanged,
    /// Completion of a task that produced nothing to dispatch.
    Idle,
}

// ── State ─────────────────────────────────────────────────────────────────────

struct PanelApp {
    panel:        Panel,
    layers:       StripLayers,
    art:          Art,
    /// Interned for `iced::Font`, which only takes `&'static str` names.
    family:       &'static str,
    menus:        mpsc::UnboundedReceiver<MenuRequest>,
    ipc:          Option<HyprlandIpc>,
    poll_pending: bool,
    config:       PanelConfig,
}

impl PanelApp {
    fn new(boot: Boot) -> (Self, Task<Message>) {
        let Boot { config, art } = boot;
        let style = Style::from_config(&config.style);
        let family: &'static str = Box::leak(style.font.family.clone().into_boxed_str());

        let strip = Size::new(config.panel.fallback_width as f32, config.panel.height as f32);
        let compositor = Compositor::new(strip, config.panel.applet_height as f32, Alpha::OPAQUE);
        let mut panel = Panel::new(compositor, VisibilityController::new(config.timing.fade()));
        let mut layers = StripLayers::default();
        let (menu_queue, menus) = MenuQueue::new();

        let measure = Rc::new(CosmicMeasure::new());
        panel.add_applet(Box::new(ClockApplet::new(style.clone(), measure)), &mut layers);
        if config.tray.enabled {
            let resolver = Rc::new(ThemeIconResolver::new(&config.tray.icon_theme));
            let row = IndicatorRow::new(style, resolver, Rc::new(menu_queue));
            panel.add_applet(Box::new(row), &mut layers);
        }

        let ipc = match HyprlandIpc::new() {
            Ok(ipc) => Some(ipc.with_timeout(config.timing.fullscreen_poll() * IPC_TIMEOUT_POLLS)),
            Err(e) => {
                warn!("Hyprland IPC unavailable, panel stays opaque: {e}");
                None
            }
        };
        info!("Panel started ({} applets)", panel.compositor().applets().count());

        let app = Self {
            panel,
            layers,
            art,
            family,
            menus,
            ipc,
            poll_pending: false,
            config,
        };
        let boot_task = app.refresh_width();
        (app, boot_task)
    }

    fn namespace() -> String {
        String::from("panel")
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(msg) => {
                if let PanelMessage::FullscreenPolled { .. } = msg {
                    self.poll_pending = false;
                }
                self.panel.handle(msg, &mut self.layers);
                self.drain_menus()
            }
            Message::Poll => self.poll(),
            Message::MonitorsChanged => self.refresh_width(),
            Message::PollFailed => {
                self.poll_pending = false;
                Task::none()
            }
            Message::Idle => Task::none(),
            // Layer-shell injected variants handled by backend in iced-layershell 0.15.
            _ => Task::none(),
        }
    }

    /// Start one fullscreen poll unless one is still in flight.
    fn poll(&mut self) -> Task<Message> {
        let Some(ipc) = self.ipc.clone() else {
            return Task::none();
        };
        if self.poll_pending {
            return Task::none();
        }
        self.poll_pending = true;

        Task::perform(async move { poll_fullscreen(&ipc).await }, |result| match result {
            Ok(fullscreen) => Message::App(PanelMessage::FullscreenPolled {
                fullscreen,
                at: Instant::now(),
            }),
            Err(e) => {
                debug!("Fullscreen poll failed: {e}");
                Message::PollFailed
            }
        })
    }

    /// Query the focused monitor's width so packing doesn't wait for the
    /// first configure.
    fn refresh_width(&self) -> Task<Message> {
        let Some(ipc) = self.ipc.clone() else {
            return Task::none();
        };
        Task::perform(async move { fetch_monitors(&ipc).await }, |result| match result {
            Ok(monitors) => {
                let monitor = monitors.iter().find(|m| m.focused).or(monitors.first());
                match monitor {
                    Some(m) => {
                        debug!("Monitor {} is {}px wide", m.name, m.logical_width());
                        Message::App(PanelMessage::ScreenResized(m.logical_width()))
                    }
                    None => Message::Idle,
                }
            }
            Err(e) => {
                warn!("Monitor query failed: {e}");
                Message::Idle
            }
        })
    }

    /// Send queued context-menu requests to their items.
    fn drain_menus(&mut self) -> Task<Message> {
        let mut tasks = Vec::new();
        while let Ok(request) = self.menus.try_recv() {
            let MenuRequest { item_id, anchor } = request;
            tasks.push(Task::perform(
                panel_tray::present_context_menu(item_id, anchor),
                |result| {
                    if let Err(e) = result {
                        warn!("Context menu failed: {e}");
                    }
                    Message::Idle
                },
            ));
        }
        Task::batch(tasks)
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        Canvas::new(StripView {
            panel:  &self.panel,
            layers: &self.layers,
            art:    &self.art,
            family: self.family,
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let timing = &self.config.timing;
        let mut subs = vec![
            iced::time::every(timing.clock()).map(|_| Message::App(PanelMessage::Tick)),
            iced::time::every(timing.fullscreen_poll()).map(|_| Message::Poll),
        ];
        if self.panel.is_animating() {
            subs.push(iced::time::every(timing.frame()).map(|at| Message::App(PanelMessage::Frame(at))));
        }
        if self.ipc.is_some() {
            subs.push(Subscription::run(ipc_stream));
        }
        if self.config.tray.enabled {
            subs.push(Subscription::run(tray_stream));
        }
        Subscription::batch(subs)
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    /// The art paints everything; the window itself stays clear.
    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: iced::Color::TRANSPARENT,
            text_color: iced::Color::BLACK,
        }
    }
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// Each free function acts as both the stream builder AND the unique identity
// key for `Subscription::run(fn_ptr)`.

/// Hyprland events that can flip the fullscreen condition trigger an
/// immediate poll; monitor hotplug refreshes the strip width.
fn ipc_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(32, |mut sender: Sender<Message>| async move {
        let ipc = match HyprlandIpc::new() {
            Ok(c) => c,
            Err(e) => {
                warn!("Hyprland event stream unavailable: {e}");
                return futures::future::pending::<()>().await;
            }
        };

        let mut events = ipc.spawn_listener();
        while let Some(event) = events.recv().await {
            let Some(message) = ipc_message(&event) else {
                continue;
            };
            if let Err(e) = futures::SinkExt::send(&mut sender, message).await {
                warn!("Hyprland stream closed: {e}");
                break;
            }
        }
        futures::future::pending::<()>().await;
    })
}

fn ipc_message(event: &HyprlandEvent) -> Option<Message> {
    match event {
        HyprlandEvent::MonitorsChanged => Some(Message::MonitorsChanged),
        e if e.triggers_poll() => Some(Message::Poll),
        _ => None,
    }
}

/// Forwards status notifier item changes to the indicator row.
fn tray_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(32, |mut sender: Sender<Message>| async move {
        let mut items = panel_tray::spawn_host();
        while let Some(event) = items.recv().await {
            if let Err(e) = futures::SinkExt::send(&mut sender, Message::App(PanelMessage::Item(event))).await {
                warn!("Tray stream closed: {e}");
                break;
            }
        }
        futures::future::pending::<()>().await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyprland_events_map_to_panel_work() {
        assert!(matches!(ipc_message(&HyprlandEvent::MonitorsChanged), Some(Message::MonitorsChanged)));
        assert!(matches!(ipc_message(&HyprlandEvent::Fullscreen(true)), Some(Message::Poll)));
        assert!(matches!(ipc_message(&HyprlandEvent::WindowMoved), Some(Message::Poll)));
        assert!(ipc_message(&HyprlandEvent::Unknown("x>>y".into())).is_none());
    }
}
