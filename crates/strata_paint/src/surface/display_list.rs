//! Recorded display list

use strata_core::{ClipRegion, Matrix, Rect};

use crate::backend::{native_underflow, DisplayListSurface};
use crate::replay::SurfaceProvider;

/// A recorded display-list entry
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayCommand {
    PushTransform(Matrix),
    PushClip(ClipRegion),
    Pop,
}

/// Display list that records strictly nested push/pop pairs
///
/// Popping with no open push would corrupt the list and is fatal.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
    /// Indices of the pushes that are still open
    open: Vec<usize>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Number of open pushes
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn is_balanced(&self) -> bool {
        self.open.is_empty()
    }

    /// Composition of every open transform push
    pub fn effective_transform(&self) -> Matrix {
        self.open_commands()
            .fold(Matrix::IDENTITY, |acc, cmd| match cmd {
                DisplayCommand::PushTransform(m) => acc.multiply(m),
                _ => acc,
            })
    }

    /// Intersection of every open clip push, in the list's root space
    pub fn effective_clip(&self) -> ClipRegion {
        let mut ctm = Matrix::IDENTITY;
        let mut clip = ClipRegion::None;
        for cmd in self.open_commands() {
            match cmd {
                DisplayCommand::PushTransform(m) => ctm = ctm.multiply(m),
                DisplayCommand::PushClip(region) => {
                    clip = clip.intersect(&region.transform(&ctm));
                }
                DisplayCommand::Pop => {}
            }
        }
        clip
    }

    fn open_commands(&self) -> impl Iterator<Item = &DisplayCommand> + '_ {
        self.open.iter().map(|&i| &self.commands[i])
    }
}

impl DisplayListSurface for DisplayList {
    fn push_transform(&mut self, matrix: &Matrix) {
        self.open.push(self.commands.len());
        self.commands.push(DisplayCommand::PushTransform(*matrix));
    }

    fn push_clip(&mut self, region: &ClipRegion) {
        self.open.push(self.commands.len());
        self.commands.push(DisplayCommand::PushClip(region.clone()));
    }

    fn pop(&mut self) {
        if self.open.pop().is_none() {
            native_underflow("display list", 1, 0);
        }
        self.commands.push(DisplayCommand::Pop);
    }
}

/// Hands out empty display lists for a recording area
#[derive(Clone, Copy, Debug)]
pub struct DisplayListProvider {
    bounds: Rect,
}

impl DisplayListProvider {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }
}

impl SurfaceProvider for DisplayListProvider {
    type Session = DisplayList;

    fn acquire(&mut self) -> DisplayList {
        DisplayList::new()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_state_tracks_open_pushes() {
        let mut list = DisplayList::new();
        list.push_transform(&Matrix::translate(5.0, 5.0));
        list.push_clip(&Rect::new(0.0, 0.0, 10.0, 10.0).into());
        list.push_transform(&Matrix::scale(2.0, 2.0));

        assert_eq!(list.depth(), 3);
        assert_eq!(
            list.effective_transform(),
            Matrix::translate(5.0, 5.0).multiply(&Matrix::scale(2.0, 2.0))
        );
        assert_eq!(
            list.effective_clip().bounds(),
            Some(Rect::new(5.0, 5.0, 10.0, 10.0))
        );

        list.pop();
        list.pop();
        list.pop();
        assert!(list.is_balanced());
        assert_eq!(list.commands().len(), 6);
        assert_eq!(list.effective_transform(), Matrix::IDENTITY);
    }

    #[test]
    #[should_panic(expected = "display list")]
    fn test_over_pop_is_fatal() {
        let mut list = DisplayList::new();
        list.push_transform(&Matrix::translate(1.0, 0.0));
        list.pop();
        list.pop();
    }
}
