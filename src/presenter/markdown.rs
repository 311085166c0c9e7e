//! Static Markdown rendering of a whole World State
//!
//! Each entity gets an HTML anchor named after its id, so every link in
//! the document jumps to its target the same way the interactive browser
//! follows it. Links to ids that do not exist are written as plain text.

use std::fmt;

use super::{DetailView, EntityDetail, Line, Presenter, Selection};
use crate::world::WorldState;

/// Render every collection, in document order, as one Markdown document
pub fn render_document(world: &WorldState) -> String {
    MarkdownDocument(world).to_string()
}

/// Render one entity as a Markdown fragment
pub fn render_detail(presenter: &Presenter<'_>, detail: &EntityDetail) -> String {
    MarkdownDetail { presenter, detail }.to_string()
}

/// Whole-document Markdown view of a World State
pub struct MarkdownDocument<'a>(pub &'a WorldState);

impl fmt::Display for MarkdownDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let world = self.0;
        let presenter = Presenter::new(world);

        writeln!(f, "# World State")?;
        writeln!(f)?;
        writeln!(f, "{}", world.counts())?;

        for group in presenter.sidebar() {
            if group.entries.is_empty() {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "## {}", group.title)?;
            for entry in &group.entries {
                if let DetailView::Entity(detail) = presenter.detail_for(&entry.selection) {
                    writeln!(f)?;
                    write!(
                        f,
                        "{}",
                        MarkdownDetail {
                            presenter: &presenter,
                            detail: &detail,
                        }
                    )?;
                }
            }
        }
        Ok(())
    }
}

struct MarkdownDetail<'p, 'w> {
    presenter: &'p Presenter<'w>,
    detail: &'p EntityDetail,
}

impl fmt::Display for MarkdownDetail<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.detail;
        writeln!(
            f,
            "### <a id=\"{}\"></a>{}",
            detail.selection.id(),
            detail.heading
        )?;

        for section in &detail.sections {
            if section.lines.is_empty() {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "**{}**", section.title)?;
            writeln!(f)?;
            for line in &section.lines {
                match line {
                    Line::Text(text) => writeln!(f, "{}", text)?,
                    Line::Item(item) => writeln!(f, "- {}", item)?,
                    Line::Link(index) => match detail.links.get(*index) {
                        Some(link) if exists(self.presenter, &link.target) => {
                            writeln!(f, "- [{}](#{})", link.label, link.target.id())?
                        }
                        Some(link) => writeln!(f, "- {}", link.label)?,
                        None => {}
                    },
                }
            }
        }
        Ok(())
    }
}

fn exists(presenter: &Presenter<'_>, target: &Selection) -> bool {
    matches!(presenter.detail_for(target), DetailView::Entity(_))
}
