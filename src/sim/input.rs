//! Input events from the host
//!
//! The host translates raw mouse/keyboard events into these; the simulation
//! only ever sees a pointer target and a handful of discrete commands.

use glam::DVec2;

use super::state::GameState;

/// Input commands delivered between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(DVec2),
    PointerUp(DVec2),
    /// Only retargets while the pointer is held
    PointerMove(DVec2),
    ToggleDebug,
    Restart,
    ToggleFullScreen,
}

/// Something the host has to do in response to an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Frame loop had stopped at game over; start requesting frames again
    ResumeFrames,
    /// Pass-through: flip fullscreen on the host surface
    ToggleFullScreen,
}

/// Apply an input event to the world
pub fn handle_input(state: &mut GameState, event: InputEvent) -> Option<HostRequest> {
    match event {
        InputEvent::PointerDown(pos) => {
            state.pointer.target = pos;
            state.pointer.pressed = true;
            None
        }
        InputEvent::PointerUp(pos) => {
            state.pointer.target = pos;
            state.pointer.pressed = false;
            None
        }
        InputEvent::PointerMove(pos) => {
            if state.pointer.pressed {
                state.pointer.target = pos;
            }
            None
        }
        InputEvent::ToggleDebug => {
            state.debug = !state.debug;
            log::info!("Debug overlay: {}", state.debug);
            None
        }
        InputEvent::Restart => {
            let was_over = state.is_over();
            state.restart();
            was_over.then_some(HostRequest::ResumeFrames)
        }
        InputEvent::ToggleFullScreen => Some(HostRequest::ToggleFullScreen),
    }
}
