//! Human-readable output with optional colors.

use std::collections::HashSet;

use chrono::{DateTime, Local, Utc};
use picto_core::{
    AssetLink, GeneratedIcon, GenerationTask, IconDetail, IconSummary, SearchResult, TaskStatus,
};
use picto_store::{FavoriteIcon, HistoryEntry, Preferences};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const NAME_WIDTH: usize = 28;
const STAR: &str = "★";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Catalogue
    // ========================================================================

    /// Formats a page of search results. Favorites are starred.
    pub fn format_search(&self, result: &SearchResult, favorites: &HashSet<u64>) -> String {
        if result.data.is_empty() {
            return self.dim("No icons found.");
        }

        let mut lines = vec![self.icon_header(), "─".repeat(64)];
        for icon in &result.data {
            lines.push(self.icon_line(icon, favorites.contains(&icon.id)));
        }

        let pagination = result.pagination();
        let mut footer = format!("Page {} of {}", pagination.current_page, pagination.last_page);
        if let Some(total) = pagination.total {
            footer.push_str(&format!(" ({total} icons)"));
        }
        lines.push(String::new());
        lines.push(self.dim(&footer));

        lines.join("\n")
    }

    /// Formats full icon details.
    pub fn format_icon_detail(&self, detail: &IconDetail, favorite: bool) -> String {
        let icon = &detail.icon;
        let mut title = format!("{} (#{})", icon.name, icon.id);
        if favorite {
            title = format!("{title} {}", self.yellow(STAR));
        }

        let mut lines = vec![self.bold(&title), "─".repeat(40)];
        lines.push(format!("Slug:       {}", icon.slug));
        if let Some(style) = &icon.style {
            lines.push(format!("Style:      {}", style.name));
        }
        if let Some(family) = &icon.family {
            lines.push(format!("Family:     {}", family.name));
        }
        if let Some(author) = &detail.author {
            lines.push(format!("Author:     {}", author.name));
        }
        if let Some(created) = &detail.created {
            lines.push(format!("Created:    {created}"));
        }
        if let Some(free_svg) = detail.free_svg {
            lines.push(format!(
                "Free SVG:   {}",
                if free_svg { self.green("yes") } else { self.dim("no") }
            ));
        }
        if !icon.tags.is_empty() {
            lines.push(format!("Tags:       {}", icon.tag_names().join(", ")));
        }
        if let Some(url) = icon.thumbnail_url() {
            lines.push(format!("Thumbnail:  {}", self.cyan(url)));
        }

        lines.join("\n")
    }

    /// Formats a download link.
    pub fn format_link(&self, link: &AssetLink) -> String {
        match &link.filename {
            Some(name) => format!("{}\n{}", self.bold(name), self.cyan(&link.url)),
            None => self.cyan(&link.url),
        }
    }

    /// Formats a saved file notice.
    pub fn format_saved(&self, path: &str) -> String {
        format!("{} {}", self.green("Saved"), path)
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Formats a task's current state.
    pub fn format_task(&self, task: &GenerationTask) -> String {
        let mut lines = vec![format!(
            "Task {}  {}",
            self.bold(&task.task_id),
            self.status_badge(task.status)
        )];
        if let Some(url) = task.outcome().url() {
            lines.push(format!("Result: {}", self.cyan(url)));
        }
        if let Some(error) = &task.error {
            lines.push(format!("Error:  {}", self.red(error)));
        }
        lines.join("\n")
    }

    /// Formats a finished generation.
    pub fn format_generated(&self, icon: &GeneratedIcon) -> String {
        format!(
            "{} task {}\n{}",
            self.green("Generated"),
            icon.task_id,
            self.cyan(&icon.url)
        )
    }

    /// Colors a task status.
    pub fn status_badge(&self, status: TaskStatus) -> String {
        match status {
            TaskStatus::Completed => self.green(status.as_str()),
            TaskStatus::Failed => self.red(status.as_str()),
            TaskStatus::Pending | TaskStatus::Processing => self.yellow(status.as_str()),
        }
    }

    // ========================================================================
    // Library
    // ========================================================================

    /// Formats the favorites list.
    pub fn format_favorites(&self, favorites: &[FavoriteIcon]) -> String {
        if favorites.is_empty() {
            return self.dim("No favorites yet.");
        }

        let mut lines = vec![self.icon_header_with("Added"), "─".repeat(64)];
        for favorite in favorites {
            lines.push(format!(
                "{}  {}",
                self.icon_line(&favorite.icon, false),
                self.dim(&local_time(favorite.added_at))
            ));
        }
        lines.join("\n")
    }

    /// Formats the history list, most recent first.
    pub fn format_history(&self, history: &[HistoryEntry]) -> String {
        if history.is_empty() {
            return self.dim("No recently used icons.");
        }

        let mut lines = vec![self.icon_header_with("Used"), "─".repeat(64)];
        for entry in history {
            lines.push(format!(
                "{}  {}",
                self.icon_line(&entry.icon, false),
                self.dim(&local_time(entry.used_at))
            ));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Formats preferences.
    pub fn format_preferences(&self, preferences: &Preferences, key_configured: bool) -> String {
        let key = if key_configured {
            self.green("configured")
        } else {
            self.red("not configured")
        };
        let relay = preferences
            .relay_url
            .as_deref()
            .map_or_else(|| self.dim("none (direct)"), str::to_string);

        [
            self.bold("Picto Configuration"),
            "─".repeat(40),
            format!("API key:          {key}"),
            format!("Download format:  {}", preferences.default_format),
            format!("PNG size:         {}px", preferences.default_png_size),
            format!("AI style:         {}", preferences.default_ai_style),
            format!("Relay:            {relay}"),
        ]
        .join("\n")
    }

    // ========================================================================
    // Layout helpers
    // ========================================================================

    fn icon_header(&self) -> String {
        self.bold(&format!(
            "{:<10} {:<NAME_WIDTH$} {:<10} {}",
            "ID", "Name", "Style", "Family"
        ))
    }

    fn icon_header_with(&self, last: &str) -> String {
        self.bold(&format!(
            "{:<10} {:<NAME_WIDTH$} {:<10} {:<10}  {}",
            "ID", "Name", "Style", "Family", last
        ))
    }

    fn icon_line(&self, icon: &IconSummary, favorite: bool) -> String {
        let style = icon.style.as_ref().map_or("−", |s| s.name.as_str());
        let family = icon.family.as_ref().map_or("−", |f| f.name.as_str());
        let line = format!(
            "{:<10} {:<NAME_WIDTH$} {:<10} {:<10}",
            icon.id,
            truncate(&icon.name, NAME_WIDTH),
            truncate(style, 10),
            truncate(family, 10)
        );
        if favorite {
            format!("{line} {}", self.yellow(STAR))
        } else {
            line
        }
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Shortens `text` to `width` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
