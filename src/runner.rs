use std::io;
use std::time::Duration;

use crossterm::event::Event;
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::drivers::InputDriver;
use crate::event_loop::{ControlFlow, EventLoop};

/// An application driven by [`run_dock_app`].
pub trait DockApp {
    fn draw(&mut self, frame: &mut ratatui::Frame);

    /// Route one terminal event. Focus notifications raised while handling it
    /// should be pumped before returning.
    fn handle_event(&mut self, event: &Event) -> ControlFlow;

    fn wants_mouse_capture(&self) -> bool {
        true
    }
}

/// Redraw on every idle turn and hand each input event to the app until it
/// asks to quit.
pub fn run_dock_app<B, D, A>(
    terminal: &mut Terminal<B>,
    driver: &mut D,
    app: &mut A,
    poll_interval: Duration,
) -> io::Result<()>
where
    B: Backend,
    D: InputDriver,
    A: DockApp,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop
        .driver()
        .set_mouse_capture(app.wants_mouse_capture())?;

    event_loop.run(|_, event| match event {
        Some(evt) => Ok(app.handle_event(&evt)),
        None => {
            terminal
                .draw(|frame| app.draw(frame))
                .map_err(|e| io::Error::other(e.to_string()))?;
            Ok(ControlFlow::Continue)
        }
    })
}
