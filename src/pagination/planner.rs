//! Page window planner
//!
//! Boundaries are spaced `page_size - 1` apart starting at `start`, strictly
//! below `end`. Each boundary opens a window that stops one before the next
//! boundary; the last one runs up to `end`.

use super::types::PageWindow;
use crate::error::{Error, Result};

/// Plan the windows covering `[start, end]` with at most `page_size` items
/// per window.
///
/// Requires `1 <= start <= end` and `page_size >= 1`.
///
/// ```
/// use array_xray::pagination::{plan, PageWindow};
///
/// let windows: Vec<PageWindow> = plan(1, 1999, 1000).unwrap().collect();
/// assert_eq!(windows, vec![PageWindow::new(1, 999), PageWindow::new(1000, 1999)]);
/// ```
pub fn plan(start: u64, end: u64, page_size: u64) -> Result<PageWindows> {
    if start == 0 || start > end || page_size == 0 {
        return Err(Error::InvalidPageRange {
            start,
            end,
            page_size,
        });
    }

    let step = if end - start < page_size {
        None
    } else {
        // A page size of 1 gives a zero spacing: fall back to one item per
        // window, which needs the last boundary to reach `end` itself.
        Some((page_size - 1).max(1))
    };
    let bound = if page_size == 1 { end + 1 } else { end };

    Ok(PageWindows {
        next: Some(start),
        end,
        bound,
        step,
    })
}

/// Lazy iterator over the planned windows.
///
/// Cloning it restarts from the current position, so a fresh plan can be
/// walked any number of times.
#[derive(Debug, Clone)]
pub struct PageWindows {
    /// Next boundary to emit, `None` once exhausted
    next: Option<u64>,
    /// Inclusive upper bound of the whole range
    end: u64,
    /// Boundaries must stay strictly below this value
    bound: u64,
    /// Spacing between boundaries, `None` when one window covers everything
    step: Option<u64>,
}

impl Iterator for PageWindows {
    type Item = PageWindow;

    fn next(&mut self) -> Option<PageWindow> {
        let from = self.next?;

        let Some(step) = self.step else {
            self.next = None;
            return Some(PageWindow::new(from, self.end));
        };

        let following = from + step;
        if following < self.bound {
            self.next = Some(following);
            Some(PageWindow::new(from, following - 1))
        } else {
            self.next = None;
            Some(PageWindow::new(from, self.end))
        }
    }
}

impl std::iter::FusedIterator for PageWindows {}
