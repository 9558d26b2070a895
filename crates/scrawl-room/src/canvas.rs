//! Drawer-only canvas operations.

use scrawl_protocol::{GameStatus, PlayerId, Recipient, ServerEvent, Stroke};

use crate::RoomError;
use crate::room::RoomActor;

impl RoomActor {
    fn check_can_draw(&self, player_id: PlayerId) -> Result<(), RoomError> {
        if self.room.status != GameStatus::Playing {
            return Err(RoomError::InvalidState("nobody is drawing right now".into()));
        }
        if self.room.drawer != Some(player_id) {
            return Err(RoomError::NotDrawer);
        }
        Ok(())
    }

    /// Stores the stroke and relays it to everyone but the drawer.
    pub(crate) fn stroke(&mut self, player_id: PlayerId, stroke: Stroke) -> Result<(), RoomError> {
        self.check_can_draw(player_id)?;
        self.room.push_stroke(stroke.clone());
        self.room
            .deliver(Recipient::AllExcept(player_id), ServerEvent::Stroke { stroke });
        Ok(())
    }

    pub(crate) fn clear_canvas(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        self.check_can_draw(player_id)?;
        self.room.clear_drawing();
        self.room.deliver(Recipient::All, ServerEvent::CanvasCleared);
        Ok(())
    }
}
