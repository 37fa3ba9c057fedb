use std::fmt::{self, Display};

/// An accepted alignment of furigana to a word.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Furigana<'a> {
    /// The segments of the original word, in reading order.
    pub furigana: Vec<FuriganaSegment<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuriganaSegment<'a> {
    /// A segment of the original word.
    pub segment: &'a str,
    /// The part of the reading aligned with the segment.
    /// None for the part of the word that was left over once the reading ran out.
    pub furigana: Option<&'a str>,
}

impl FuriganaSegment<'_> {
    /// Checks whether the segment needs no annotation, either because it is read as written or
    /// because it has no reading.
    pub fn is_plain(&self) -> bool {
        self.furigana.map_or(true, |furigana| furigana == self.segment)
    }
}

/// How the segments are laid out in a `<ruby>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Each annotated segment gets its own `<ruby>`, plain segments are written as is.
    #[default]
    Ungrouped,
    /// A single `<ruby>` with the segments separated by `<rb>` and their readings by `<rt>`.
    Grouped,
}

impl<'a> Furigana<'a> {
    /// The word that was aligned.
    pub fn text(&self) -> String {
        self.furigana.iter().map(|s| s.segment).collect()
    }

    /// The reading that was aligned.
    pub fn reading(&self) -> String {
        self.furigana
            .iter()
            .filter_map(|s| s.furigana)
            .collect()
    }

    /// Pairs of segment and reading, with an empty reading for unannotated segments.
    pub fn pairs(&self) -> Vec<(&'a str, &'a str)> {
        self.furigana
            .iter()
            .map(|s| (s.segment, s.furigana.unwrap_or("")))
            .collect()
    }

    /// Displays the alignment as HTML ruby markup in the given layout.
    pub fn html(&self, layout: Layout) -> Html<'_, 'a> {
        Html {
            furigana: self,
            layout,
        }
    }

    pub fn to_html(&self, layout: Layout) -> String {
        self.html(layout).to_string()
    }

    fn write_html(&self, f: &mut fmt::Formatter<'_>, layout: Layout) -> fmt::Result {
        match layout {
            Layout::Ungrouped => {
                for segment in &self.furigana {
                    match segment.furigana {
                        Some(furigana) if !segment.is_plain() => {
                            write!(f, "<ruby>{}<rt>{}</ruby>", segment.segment, furigana)?
                        }
                        _ => write!(f, "{}", segment.segment)?,
                    }
                }
            }
            Layout::Grouped => {
                write!(f, "<ruby>")?;
                for (idx, segment) in self.furigana.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "<rb>")?;
                    }
                    write!(f, "{}", segment.segment)?;
                }
                write!(f, "<rt>")?;
                for (idx, segment) in self.furigana.iter().enumerate() {
                    if idx > 0 {
                        write!(f, "<rt>")?;
                    }
                    write!(f, "{}", segment.furigana.unwrap_or(""))?;
                }
                write!(f, "</ruby>")?;
            }
        }
        Ok(())
    }
}

/// Prints the word with its furigana using HTML ruby tags.
impl Display for Furigana<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_html(f, Layout::Ungrouped)
    }
}

/// A [`Furigana`] written as ruby markup, see [`Furigana::html`].
#[derive(Debug, Clone, Copy)]
pub struct Html<'f, 'a> {
    furigana: &'f Furigana<'a>,
    layout: Layout,
}

impl Display for Html<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.furigana.write_html(f, self.layout)
    }
}

/// Markup for a word whose reading could not be aligned.
pub fn error_html(text: &str, reading: &str) -> String {
    format!("<ruby class=\"r_error\">{text}<rt>{reading}</ruby>")
}
