/// RIFF CHUNK TREE.
/// every chunk is a 4-byte id, a 4-byte little-endian length, and `length` bytes of payload.
/// RIFF and LIST chunks are containers: their payload starts with a 4-byte sub-id,
/// followed by more chunks.
/// the tree is built once, and only records where each leaf lives in the file.
/// nothing inside a leaf is read here.
use std::fmt;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FourCC(pub [u8; 4]);

impl fmt::Display for FourCC {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for &b in self.0.iter() {
			if b.is_ascii_graphic() || b == b' ' {
				write!(f, "{}", b as char)?;
			} else {
				write!(f, "\\x{:02x}", b)?;
			}
		}
		Ok(())
	}
}

impl fmt::Debug for FourCC {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "FourCC({})", self)
	}
}

/// only for literals -- ids read from a file can be any 4 bytes.
pub const fn fourcc(s: &str) -> FourCC {
	let bytes = s.as_bytes();
	if bytes.len() != 4 {
		panic!("bad fourcc");
	}
	let mut i = 0;
	while i < 4 {
		if bytes[i] == 0 || bytes[i] >= 128 {
			panic!("bad fourcc");
		}
		i += 1;
	}
	FourCC([bytes[0], bytes[1], bytes[2], bytes[3]])
}

pub const RIFF: FourCC = fourcc("RIFF");
pub const LIST: FourCC = fourcc("LIST");
pub const SFBK: FourCC = fourcc("sfbk");
pub const INFO: FourCC = fourcc("INFO");
pub const INAM: FourCC = fourcc("INAM");
pub const SDTA: FourCC = fourcc("sdta");
pub const SMPL: FourCC = fourcc("smpl");
pub const PDTA: FourCC = fourcc("pdta");
pub const PHDR: FourCC = fourcc("phdr");
pub const PBAG: FourCC = fourcc("pbag");
pub const PMOD: FourCC = fourcc("pmod");
pub const PGEN: FourCC = fourcc("pgen");
pub const INST: FourCC = fourcc("inst");
pub const IBAG: FourCC = fourcc("ibag");
pub const IMOD: FourCC = fourcc("imod");
pub const IGEN: FourCC = fourcc("igen");
pub const SHDR: FourCC = fourcc("shdr");

pub const HEADER_SIZE: u64 = 8;
const SUB_ID_SIZE: u64 = 4;
// each level costs at least 12 bytes of file, but a crafted file could still blow the stack
const MAX_DEPTH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
	pub id: FourCC,
	pub length: u32,
}

/// where a leaf chunk's payload lives. `offset` is just past the 8-byte header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
	pub offset: u64,
	pub length: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkNode {
	Container {
		id: FourCC,
		sub_id: FourCC,
		/// offset of the chunk header
		offset: u64,
		length: u32,
		/// at most one child per key, in file order
		children: Vec<ChunkNode>,
	},
	Leaf {
		id: FourCC,
		span: Span,
	},
}

/// read the (id, length) header at `offset`.
pub fn read_header<R: Read + Seek>(source: &mut R, offset: u64) -> Result<ChunkHeader> {
	source.seek(SeekFrom::Start(offset))?;
	let mut bytes = [0; 8];
	source.read_exact(&mut bytes).map_err(|e| match e.kind() {
		ErrorKind::UnexpectedEof => Error::TruncatedHeader { offset },
		_ => Error::Io(e),
	})?;
	Ok(ChunkHeader {
		id: FourCC([bytes[0], bytes[1], bytes[2], bytes[3]]),
		length: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
	})
}

fn malformed(id: FourCC, offset: u64, reason: String) -> Error {
	Error::MalformedChunk { id, offset, reason }
}

/// walk the chunk starting at `offset` (and everything inside it).
/// returns the node and the number of bytes it takes up, header included.
pub fn walk<R: Read + Seek>(source: &mut R, offset: u64) -> Result<(ChunkNode, u64)> {
	let total = source.seek(SeekFrom::End(0))?;
	walk_at(source, offset, total, 0)
}

fn walk_at<R: Read + Seek>(
	source: &mut R,
	offset: u64,
	total: u64,
	depth: usize,
) -> Result<(ChunkNode, u64)> {
	let header = read_header(source, offset)?;
	let consumed = HEADER_SIZE + header.length as u64;
	if offset + consumed > total {
		return Err(malformed(
			header.id,
			offset,
			format!(
				"declared length {} runs past the end of the file ({} bytes)",
				header.length, total
			),
		));
	}

	if header.id != RIFF && header.id != LIST {
		trace!(id = %header.id, offset, length = header.length, "leaf chunk");
		let span = Span {
			offset: offset + HEADER_SIZE,
			length: header.length,
		};
		return Ok((ChunkNode::Leaf { id: header.id, span }, consumed));
	}

	if (header.length as u64) < SUB_ID_SIZE {
		return Err(malformed(
			header.id,
			offset,
			format!("container length {} is less than 4", header.length),
		));
	}
	if depth >= MAX_DEPTH {
		return Err(malformed(header.id, offset, "chunks nested too deeply".to_string()));
	}

	// read_header left us right after the header
	let mut sub_id = [0; 4];
	source.read_exact(&mut sub_id)?;
	let sub_id = FourCC(sub_id);
	debug!(id = %header.id, sub_id = %sub_id, offset, length = header.length, "container chunk");

	let mut children: Vec<ChunkNode> = vec![];
	let mut pos = HEADER_SIZE + SUB_ID_SIZE;
	while pos < consumed {
		let child_offset = offset + pos;
		let (child, child_consumed) = walk_at(source, child_offset, total, depth + 1)?;
		pos += child_consumed;
		if pos > consumed {
			return Err(malformed(
				child.id(),
				child_offset,
				format!("runs past the end of its parent '{}'", sub_id),
			));
		}
		match children.iter_mut().find(|c| c.key() == child.key()) {
			Some(existing) => {
				// last one wins
				warn!(key = %child.key(), parent = %sub_id, "duplicate chunk replaces an earlier sibling");
				*existing = child;
			}
			None => children.push(child),
		}
	}

	let node = ChunkNode::Container {
		id: header.id,
		sub_id,
		offset,
		length: header.length,
		children,
	};
	Ok((node, consumed))
}

impl ChunkNode {
	pub fn id(&self) -> FourCC {
		match self {
			ChunkNode::Container { id, .. } | ChunkNode::Leaf { id, .. } => *id,
		}
	}

	/// the name this node goes by in its parent: the sub-id for containers, the id for leaves.
	pub fn key(&self) -> FourCC {
		match self {
			ChunkNode::Container { sub_id, .. } => *sub_id,
			ChunkNode::Leaf { id, .. } => *id,
		}
	}

	/// bytes this chunk takes up in the file, header included
	pub fn consumed(&self) -> u64 {
		let length = match self {
			ChunkNode::Container { length, .. } => *length,
			ChunkNode::Leaf { span, .. } => span.length,
		};
		HEADER_SIZE + length as u64
	}

	pub fn children(&self) -> &[ChunkNode] {
		match self {
			ChunkNode::Container { children, .. } => children,
			ChunkNode::Leaf { .. } => &[],
		}
	}

	pub fn child(&self, key: FourCC) -> Option<&ChunkNode> {
		self.children().iter().find(|c| c.key() == key)
	}

	/// follow `keys` down from this node. fails naming the first key that isn't there.
	pub fn find(&self, keys: &[FourCC]) -> Result<&ChunkNode> {
		let mut node = self;
		for &key in keys {
			node = node.child(key).ok_or(Error::MissingChunk(key))?;
		}
		Ok(node)
	}

	/// like `find`, but the chunk found has to be a leaf.
	pub fn find_leaf(&self, keys: &[FourCC]) -> Result<Span> {
		match self.find(keys)? {
			ChunkNode::Leaf { span, .. } => Ok(*span),
			ChunkNode::Container {
				id, sub_id, offset, ..
			} => Err(malformed(
				*id,
				*offset,
				format!("expected a data chunk, found a '{}' list", sub_id),
			)),
		}
	}

	/// calls `f` on this node and every node below it, parents first, with their depth.
	pub fn visit<F: FnMut(usize, &ChunkNode)>(&self, f: &mut F) {
		self.visit_at(0, f);
	}

	fn visit_at<F: FnMut(usize, &ChunkNode)>(&self, depth: usize, f: &mut F) {
		f(depth, self);
		for child in self.children() {
			child.visit_at(depth + 1, f);
		}
	}
}
