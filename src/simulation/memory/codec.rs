//! Binary wire format for belief grids and peer messages.
//!
//! All integers are big-endian:
//!
//! ```text
//! grid    := side:u32 center_x:i32 center_y:i32 cell*(side*side)   (row-major)
//! cell    := wall:u8 food:u32 occupancy:u32 last_seen:i64          (-1 = never seen)
//! message := tick:i64 grid
//! ```
//!
//! Decoding validates the whole payload before building anything, so a
//! rejected message never leaves a half-populated grid behind.

use crate::simulation::error::CodecError;
use crate::simulation::memory::belief_grid::{BeliefGrid, CellBelief, Tick, MAX_TICK};

/// Encoded size of one cell.
pub const CELL_BYTES: usize = 1 + 4 + 4 + 8;
/// Encoded size of the grid header.
pub const GRID_HEADER_BYTES: usize = 4 + 4 + 4;
/// Sentinel for a cell that was never observed.
const NEVER_SEEN: i64 = -1;

/// Appends fixed-width big-endian fields to a buffer.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads fixed-width big-endian fields, failing on truncation.
#[derive(Debug)]
pub struct WireReader<'a> {
    bytes: &'a [u8],
}

impl<'a> WireReader<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len()
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let Some((head, tail)) = self.bytes.split_first_chunk::<N>() else {
            return Err(CodecError::Truncated {
                needed: N,
                remaining: self.bytes.len(),
            });
        };
        self.bytes = tail;
        Ok(*head)
    }

    pub fn u8(&mut self) -> Result<u8, CodecError> {
        self.take::<1>().map(|[b]| b)
    }

    pub fn u32(&mut self) -> Result<u32, CodecError> {
        self.take().map(u32::from_be_bytes)
    }

    pub fn i32(&mut self) -> Result<i32, CodecError> {
        self.take().map(i32::from_be_bytes)
    }

    pub fn i64(&mut self) -> Result<i64, CodecError> {
        self.take().map(i64::from_be_bytes)
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        match self.bytes.len() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

fn encode_tick(tick: Option<Tick>) -> i64 {
    tick.map_or(NEVER_SEEN, i64::from)
}

fn decode_tick(index: usize, value: i64) -> Result<Option<Tick>, CodecError> {
    if value == NEVER_SEEN {
        return Ok(None);
    }
    wire_tick(value)
        .map(Some)
        .ok_or(CodecError::InvalidTick { index, value })
}

/// A tick in `0..=MAX_TICK`, or `None` if out of range.
fn wire_tick(value: i64) -> Option<Tick> {
    Tick::try_from(value).ok().filter(|tick| *tick <= MAX_TICK)
}

impl BeliefGrid {
    /// Writes the grid to `out`.
    pub fn write_to(&self, out: &mut WireWriter) {
        let (center_x, center_y) = self.center();
        out.put_u32(self.side() as u32);
        out.put_i32(center_x);
        out.put_i32(center_y);
        for cell in self.cells() {
            out.put_u8(u8::from(cell.wall));
            out.put_u32(cell.food);
            out.put_u32(cell.occupancy);
            out.put_i64(encode_tick(cell.last_seen));
        }
    }

    /// Encodes the grid as a standalone byte sequence.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = WireWriter::with_capacity(
            GRID_HEADER_BYTES + self.cells().len() * CELL_BYTES,
        );
        self.write_to(&mut out);
        out.into_bytes()
    }

    /// Reads a grid from `input`, leaving any following bytes unread.
    pub fn read_from(input: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let side_raw = input.u32()?;
        let center_x = input.i32()?;
        let center_y = input.i32()?;

        if side_raw == 0 {
            return Err(CodecError::EmptyGrid);
        }
        let side = usize::try_from(side_raw).map_err(|_| CodecError::OversizedGrid(side_raw))?;
        let in_bounds = |c: i32| c >= 0 && i64::from(c) < i64::from(side_raw);
        if !in_bounds(center_x) || !in_bounds(center_y) {
            return Err(CodecError::AnchorOutOfBounds {
                x: center_x,
                y: center_y,
                side: side_raw,
            });
        }

        let count = side
            .checked_mul(side)
            .ok_or(CodecError::OversizedGrid(side_raw))?;
        let needed = count
            .checked_mul(CELL_BYTES)
            .ok_or(CodecError::OversizedGrid(side_raw))?;
        if needed > input.remaining() {
            return Err(CodecError::Truncated {
                needed,
                remaining: input.remaining(),
            });
        }

        let mut cells = Vec::with_capacity(count);
        for index in 0..count {
            let wall = match input.u8()? {
                0 => false,
                1 => true,
                value => return Err(CodecError::InvalidWallFlag { index, value }),
            };
            let food = input.u32()?;
            let occupancy = input.u32()?;
            let last_seen = decode_tick(index, input.i64()?)?;
            let cell = CellBelief {
                wall,
                food,
                occupancy,
                last_seen,
            };
            if !cell.is_known() && cell != CellBelief::UNKNOWN {
                return Err(CodecError::PhantomCell { index });
            }
            cells.push(cell);
        }

        Ok(Self::from_parts(side, center_x, center_y, cells))
    }

    /// Decodes a grid produced by [`BeliefGrid::serialize`].
    ///
    /// Only cells and anchor travel on the wire; the result carries the
    /// default decay policy.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut input = WireReader::new(bytes);
        let grid = Self::read_from(&mut input)?;
        input.finish()?;
        Ok(grid)
    }
}

/// Encodes a peer message: the sender's tick followed by its grid.
#[must_use]
pub fn encode_message(tick: Tick, grid: &BeliefGrid) -> Vec<u8> {
    let mut out = WireWriter::with_capacity(8 + GRID_HEADER_BYTES + grid.cells().len() * CELL_BYTES);
    out.put_i64(i64::from(tick));
    grid.write_to(&mut out);
    out.into_bytes()
}

/// Decodes a peer message into the sender's tick and grid.
pub fn decode_message(bytes: &[u8]) -> Result<(Tick, BeliefGrid), CodecError> {
    let mut input = WireReader::new(bytes);
    let raw_tick = input.i64()?;
    let tick = wire_tick(raw_tick).ok_or(CodecError::InvalidSenderTick(raw_tick))?;
    let grid = BeliefGrid::read_from(&mut input)?;
    input.finish()?;
    Ok((tick, grid))
}
