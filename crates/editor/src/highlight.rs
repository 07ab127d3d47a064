use std::time::{Duration, Instant};

pub const DEFAULT_HIGHLIGHT_LIFETIME: Duration = Duration::from_millis(2000);

/// Transient overlay marking one source line.
///
/// The band is approximate: the rendered height is split evenly across lines, which drifts once
/// long lines wrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub line_number: usize,
    pub created_at: Instant,
    pub top: f32,
    pub height: f32,
}

impl Highlight {
    #[must_use]
    pub fn is_expired(&self, now: Instant, lifetime: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= lifetime
    }
}

/// Expiring overlays. Overlays never cancel early and are not capped; several may coexist.
#[derive(Debug, Clone)]
pub struct HighlightBoard {
    lifetime: Duration,
    overlays: Vec<Highlight>,
}

impl Default for HighlightBoard {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_LIFETIME)
    }
}

impl HighlightBoard {
    #[must_use]
    pub const fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            overlays: Vec::new(),
        }
    }

    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Place an overlay for `line` unless it is outside `1..=line_count`.
    pub fn place(
        &mut self,
        line: usize,
        line_count: usize,
        rendered_height: f32,
        now: Instant,
    ) -> Option<Highlight> {
        if line == 0 || line > line_count {
            log::debug!("highlight ignored: line {line} outside 1..={line_count}");
            return None;
        }
        let height = rendered_height / line_count as f32;
        let overlay = Highlight {
            line_number: line,
            created_at: now,
            top: (line - 1) as f32 * height,
            height,
        };
        self.overlays.push(overlay);
        Some(overlay)
    }

    /// Drop expired overlays; returns how many were removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.overlays.len();
        let lifetime = self.lifetime;
        self.overlays.retain(|h| !h.is_expired(now, lifetime));
        before - self.overlays.len()
    }

    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Highlight> + '_ {
        let lifetime = self.lifetime;
        self.overlays
            .iter()
            .filter(move |h| !h.is_expired(now, lifetime))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}
