use std::ops::Range;

/// Indicates a region in the source code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceSpan {
	start: usize,
	end: usize,
}

impl SourceSpan {
	/// Creates a new source span from offset and length
	pub fn new(offset: usize, len: usize) -> SourceSpan {
		SourceSpan {
			start: offset,
			end: offset + len,
		}
	}

	pub fn new_between(start: usize, end: usize) -> SourceSpan {
		SourceSpan { start, end }
	}

	/// Creates a new span from a Range type
	pub fn new_from_range(range: &Range<usize>) -> SourceSpan {
		SourceSpan {
			start: range.start,
			end: range.end,
		}
	}

	/// Returns start of the span
	pub fn start(&self) -> usize {
		self.start
	}

	/// Returns end of the span
	pub fn end(&self) -> usize {
		self.end
	}

	/// Returns length of the span
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Smallest span covering both spans
	pub fn join(&self, other: &SourceSpan) -> SourceSpan {
		SourceSpan::new_between(self.start.min(other.start), self.end.max(other.end))
	}
}

impl From<SourceSpan> for miette::SourceSpan {
	fn from(span: SourceSpan) -> Self {
		(span.start, span.len()).into()
	}
}
