use std::cell::RefCell;
use std::io::{Read, Seek, SeekFrom};
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::records::Record;
use crate::riff::Span;

/// A leaf chunk seen as an array of `T` records.
/// Nothing is read up front: every `get`/`slice` seeks to the records asked for
/// and reads just those bytes. Trailing bytes that don't make up a whole record
/// are ignored.
pub struct ChunkView<'a, R, T> {
	source: &'a RefCell<R>,
	span: Span,
	count: usize,
	_record: PhantomData<fn() -> T>,
}

impl<'a, R: Read + Seek, T: Record> ChunkView<'a, R, T> {
	pub fn new(source: &'a RefCell<R>, span: Span) -> Self {
		Self {
			source,
			span,
			count: span.length as usize / T::SIZE,
			_record: PhantomData,
		}
	}

	pub fn len(&self) -> usize {
		self.count
	}

	pub fn is_empty(&self) -> bool {
		self.count == 0
	}

	pub fn get(&self, index: usize) -> Result<T> {
		if index >= self.count {
			return Err(Error::IndexOutOfRange {
				range: index..index.saturating_add(1),
				count: self.count,
			});
		}
		let buf = self.read(index, 1)?;
		T::decode(&buf, 0)
	}

	/// records `start..end`, in order.
	pub fn slice(&self, start: usize, end: usize) -> Result<Vec<T>> {
		if start > end || end > self.count {
			return Err(Error::IndexOutOfRange {
				range: start..end,
				count: self.count,
			});
		}
		let buf = self.read(start, end - start)?;
		(0..end - start).map(|i| T::decode(&buf, i * T::SIZE)).collect()
	}

	// one seek, one read
	fn read(&self, start: usize, count: usize) -> Result<Vec<u8>> {
		let mut buf = vec![0; count * T::SIZE];
		if buf.is_empty() {
			return Ok(buf);
		}
		let mut source = self.source.borrow_mut();
		source.seek(SeekFrom::Start(self.span.offset + (start * T::SIZE) as u64))?;
		source.read_exact(&mut buf)?;
		Ok(buf)
	}
}
