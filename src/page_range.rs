use crate::error::Error;
use std::fmt;
use std::num::IntErrorKind;

/// One side of a range. Numbers are kept as typed, sign included, so that
/// out-of-range integers are reported as a bad range rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRef {
    Number(i64),
    End,
}

impl PageRef {
    fn resolve(&self, total_pages: u32) -> i64 {
        match self {
            PageRef::Number(n) => *n,
            PageRef::End => i64::from(total_pages),
        }
    }
}

/// A page range as typed by the user, before the page total is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    pub start: PageRef,
    pub end: Option<PageRef>,
}

/// A validated, 1-based inclusive page span within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Parse a page range specification like "3", "2-7" or "4-end"
    pub fn parse(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::MissingPageNumbers);
        }

        // A leading '-' is a sign, not a separator.
        let separator = s.char_indices().skip(1).find(|&(_, c)| c == '-');
        match separator.map(|(pos, _)| pos) {
            Some(dash_pos) => Ok(PageRange {
                start: parse_page_ref(&s[..dash_pos])?,
                end: Some(parse_page_ref(&s[dash_pos + 1..])?),
            }),
            None => Ok(PageRange {
                start: parse_page_ref(s)?,
                end: None,
            }),
        }
    }

    /// Resolve against a document's page count.
    pub fn resolve(&self, total_pages: u32) -> Result<PageSpan, Error> {
        let start = self.start.resolve(total_pages);
        let end = self
            .end
            .as_ref()
            .map_or(start, |end| end.resolve(total_pages));
        PageSpan::new(start, end, total_pages)
    }
}

impl PageSpan {
    /// Check `1 <= start <= end <= total_pages`.
    pub fn new(start: i64, end: i64, total_pages: u32) -> Result<Self, Error> {
        if start < 1 || end > i64::from(total_pages) || start > end {
            tracing::debug!(start, end, total = total_pages, "page range out of bounds");
            return Err(Error::InvalidPageRange {
                start,
                end,
                total: total_pages,
            });
        }
        // Both sides lie within 1..=total_pages here.
        Ok(PageSpan {
            start: start as u32,
            end: end as u32,
        })
    }

    /// Build a span from two separately entered page numbers.
    ///
    /// Both answers are required; either may be the keyword `end`.
    pub fn from_answers(start: &str, end: &str, total_pages: u32) -> Result<Self, Error> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(Error::MissingPageNumbers);
        }
        let start = parse_page_ref(start)?.resolve(total_pages);
        let end = parse_page_ref(end)?.resolve(total_pages);
        PageSpan::new(start, end, total_pages)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.start..=self.end).contains(&page)
    }
}

impl fmt::Display for PageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn parse_page_ref(s: &str) -> Result<PageRef, Error> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("end") {
        Ok(PageRef::End)
    } else {
        match s.parse::<i64>() {
            Ok(n) => Ok(PageRef::Number(n)),
            // Still an integer, just a huge one; the bounds check rejects it.
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(PageRef::Number(i64::MAX)),
            Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(PageRef::Number(i64::MIN)),
            Err(_) => {
                tracing::debug!(input = s, "page number is not an integer");
                Err(Error::InvalidPageNumber(s.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_page() {
        let range = PageRange::parse("5").unwrap();
        assert_eq!(range.start, PageRef::Number(5));
        assert_eq!(range.end, None);
        assert_eq!(range.resolve(10).unwrap(), PageSpan { start: 5, end: 5 });
    }

    #[test]
    fn test_page_range() {
        let span = PageRange::parse("2-7").unwrap().resolve(10).unwrap();
        assert_eq!(span, PageSpan { start: 2, end: 7 });
        assert_eq!(span.len(), 6);
        assert!(span.contains(2) && span.contains(7));
        assert!(!span.contains(8));
    }

    #[test]
    fn test_end_keyword() {
        let span = PageRange::parse("5-END").unwrap().resolve(10).unwrap();
        assert_eq!(span, PageSpan { start: 5, end: 10 });
    }

    #[test]
    fn test_reverse_range_rejected() {
        let err = PageRange::parse("5-1").unwrap().resolve(10).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidPageRange {
                start: 5,
                end: 1,
                total: 10
            }
        );
    }

    #[test]
    fn test_invalid_page_zero() {
        assert!(PageRange::parse("0-3").unwrap().resolve(10).is_err());
    }

    #[test]
    fn test_page_exceeds_total() {
        assert!(PageRange::parse("3-15").unwrap().resolve(10).is_err());
    }

    #[test]
    fn test_garbage_is_not_a_number() {
        assert_eq!(
            PageRange::parse("two").unwrap_err(),
            Error::InvalidPageNumber("two".to_string())
        );
        assert_eq!(
            PageRange::parse("1-").unwrap_err(),
            Error::InvalidPageNumber(String::new())
        );
        assert_eq!(PageRange::parse("  ").unwrap_err(), Error::MissingPageNumbers);
    }

    #[test]
    fn test_negative_pages_are_out_of_range() {
        let range = PageRange::parse("-5").unwrap();
        assert_eq!(range.start, PageRef::Number(-5));
        assert_eq!(
            range.resolve(10).unwrap_err(),
            Error::InvalidPageRange {
                start: -5,
                end: -5,
                total: 10
            }
        );

        let range = PageRange::parse("-1-3").unwrap();
        assert_eq!(range.start, PageRef::Number(-1));
        assert_eq!(range.end, Some(PageRef::Number(3)));
        assert!(matches!(
            range.resolve(10),
            Err(Error::InvalidPageRange { start: -1, .. })
        ));
    }

    #[test]
    fn test_out_of_range_integers_are_not_garbage() {
        assert_eq!(
            PageSpan::from_answers("-1", "3", 5).unwrap_err(),
            Error::InvalidPageRange {
                start: -1,
                end: 3,
                total: 5
            }
        );
        assert_eq!(
            PageSpan::from_answers("1", "99999999999", 5).unwrap_err(),
            Error::InvalidPageRange {
                start: 1,
                end: 99_999_999_999,
                total: 5
            }
        );
        // Too big even for i64, but still an integer.
        assert!(matches!(
            PageSpan::from_answers("1", "99999999999999999999999", 5),
            Err(Error::InvalidPageRange { end: i64::MAX, .. })
        ));
        assert_eq!(
            PageSpan::from_answers("1", "-99999999999999999999999", 5)
                .unwrap_err()
                .to_string(),
            "Invalid page range! Please enter numbers between 1 and 5"
        );
    }

    #[test]
    fn test_from_answers() {
        assert_eq!(
            PageSpan::from_answers(" 2 ", "4", 5).unwrap(),
            PageSpan { start: 2, end: 4 }
        );
        assert_eq!(
            PageSpan::from_answers("", "4", 5).unwrap_err(),
            Error::MissingPageNumbers
        );
        assert_eq!(
            PageSpan::from_answers("1.5", "4", 5).unwrap_err(),
            Error::InvalidPageNumber("1.5".to_string())
        );
        assert_eq!(
            PageSpan::from_answers("3", "end", 9).unwrap().to_string(),
            "3-9"
        );
    }
}
