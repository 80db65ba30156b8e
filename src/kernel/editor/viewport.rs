use super::registry::{ModelId, PreviewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Model(ModelId),
    Preview(PreviewId),
}

/// The one editor viewport. Holds at most one surface; `None` is the intro state.
#[derive(Debug, Default)]
pub struct Viewport {
    mounted: Option<Surface>,
}

impl Viewport {
    pub fn mounted(&self) -> Option<Surface> {
        self.mounted
    }

    /// Mounts `surface`, returning whatever it replaced.
    pub fn mount(&mut self, surface: Surface) -> Option<Surface> {
        self.mounted.replace(surface)
    }

    pub fn unmount(&mut self) -> Option<Surface> {
        self.mounted.take()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_none()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/editor/viewport.rs"]
mod tests;
