// mfulmap-rs/mfulmap/src/transport/mock.rs

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::constants::{
    ACK, BLOCK_SIZE, RAW_HEADER, READ_RESPONSE_LEN, SECTOR_SELECT_CMD, SECTOR_SIZE,
};
use crate::protocol::crc::crc_a;
use crate::protocol::{Command, Request};
use crate::transport::traits::Transport;
use crate::{Error, Result};

/// In-memory Mifare Ultralight used by unit and integration tests.
///
/// It services READ, WRITE and the two SECTOR_SELECT packets against its
/// memory image, records every request, and queues the reply so the test
/// decides when to feed it back into the mapping.
#[derive(Debug)]
pub struct MockTag {
    memory: Vec<u8>,
    selected: usize,
    select_armed: bool,
    pub sent: Vec<Request>,
    replies: VecDeque<Result<Vec<u8>>>,
    /// Request indexes that fail with `Error::Timeout`.
    failures: Vec<usize>,
    /// Request indexes whose reply is replaced.
    overrides: HashMap<usize, Vec<u8>>,
}

impl MockTag {
    /// Blank tag with `sectors` sectors of zeroed memory.
    pub fn new(sectors: usize) -> Self {
        Self::with_memory(vec![0u8; sectors.max(1) * SECTOR_SIZE])
    }

    /// Tag backed by the given image, padded to whole sectors.
    pub fn with_memory(mut memory: Vec<u8>) -> Self {
        let sectors = memory.len().div_ceil(SECTOR_SIZE).max(1);
        memory.resize(sectors * SECTOR_SIZE, 0);
        Self {
            memory,
            selected: 0,
            select_armed: false,
            sent: Vec::new(),
            replies: VecDeque::new(),
            failures: Vec::new(),
            overrides: HashMap::new(),
        }
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    pub fn sectors(&self) -> usize {
        self.memory.len() / SECTOR_SIZE
    }

    pub fn selected_sector(&self) -> usize {
        self.selected
    }

    /// Make the `index`-th request (counting from the first one ever
    /// submitted) fail with a timeout.
    pub fn fail_request(&mut self, index: usize) {
        self.failures.push(index);
    }

    /// Replace the reply to the `index`-th request.
    pub fn override_reply(&mut self, index: usize, reply: Vec<u8>) {
        self.overrides.insert(index, reply);
    }

    /// Number of sector select handshakes started at or after request
    /// index `from`.
    pub fn sector_selects_since(&self, from: usize) -> usize {
        self.sent
            .iter()
            .skip(from)
            .filter(|r| matches!(r.command, Command::SectorSelectIntent))
            .count()
    }

    /// Block-per-line dump of `count` blocks of sector 0 starting at
    /// `first_block`, for test failure messages.
    pub fn dump(&self, first_block: usize, count: usize) -> String {
        let start = (first_block * BLOCK_SIZE).min(self.memory.len());
        let end = (start + count * BLOCK_SIZE).min(self.memory.len());
        crate::utils::block_dump(&self.memory[start..end], first_block)
    }

    /// Execute a request and queue its reply.
    pub fn submit(&mut self, request: &Request) -> Result<()> {
        let index = self.sent.len();
        self.sent.push(*request);

        let reply = if self.failures.contains(&index) {
            Err(Error::Timeout)
        } else {
            match self.overrides.remove(&index) {
                Some(bytes) => Ok(bytes),
                None => self.execute(request),
            }
        };
        self.replies.push_back(reply);
        Ok(())
    }

    /// Pop the oldest queued reply.
    pub fn take_reply(&mut self) -> Option<Result<Vec<u8>>> {
        self.replies.pop_front()
    }

    fn sector_base(&self) -> Result<usize> {
        if self.selected >= self.sectors() {
            return Err(Error::Transport(format!(
                "sector {} not present",
                self.selected
            )));
        }
        Ok(self.selected * SECTOR_SIZE)
    }

    fn execute(&mut self, request: &Request) -> Result<Vec<u8>> {
        let payload = request.payload();
        match request.command {
            Command::Read { block } => {
                let base = self.sector_base()?;
                let start = block as usize * BLOCK_SIZE;
                Ok((0..READ_RESPONSE_LEN)
                    .map(|i| self.memory[base + (start + i) % SECTOR_SIZE])
                    .collect())
            }
            Command::Write { block, data } => {
                let base = self.sector_base()?;
                let start = base + block as usize * BLOCK_SIZE;
                self.memory[start..start + BLOCK_SIZE].copy_from_slice(&data);
                Ok(vec![ACK])
            }
            Command::SectorSelectIntent => {
                self.check_raw_frame(payload)?;
                if payload[RAW_HEADER.len()..payload.len() - 2] != SECTOR_SELECT_CMD {
                    return Err(Error::Transport("malformed sector select".into()));
                }
                self.select_armed = true;
                Ok(vec![ACK])
            }
            Command::SectorSelectTarget { sector } => {
                self.check_raw_frame(payload)?;
                if !self.select_armed {
                    return Err(Error::Transport("sector select out of sequence".into()));
                }
                self.select_armed = false;
                if sector as usize >= self.sectors() {
                    return Err(Error::Transport(format!("sector {} not present", sector)));
                }
                self.selected = sector as usize;
                // passive ACK: the tag stays silent
                Ok(Vec::new())
            }
        }
    }

    fn check_raw_frame(&self, payload: &[u8]) -> Result<()> {
        let n = payload.len();
        if n < RAW_HEADER.len() + 2 || payload[..RAW_HEADER.len()] != RAW_HEADER {
            return Err(Error::Transport("malformed raw frame".into()));
        }
        if crc_a(&payload[RAW_HEADER.len()..n - 2]) != payload[n - 2..] {
            return Err(Error::Transport("CRC-A mismatch".into()));
        }
        Ok(())
    }
}

/// Mock transport for tests. Clones share the same [`MockTag`], so a test
/// can hand one clone to the mapping and keep another to inspect the tag
/// and feed replies back.
#[derive(Debug, Clone)]
pub struct MockTransport {
    tag: Rc<RefCell<MockTag>>,
}

impl MockTransport {
    pub fn new(tag: MockTag) -> Self {
        Self {
            tag: Rc::new(RefCell::new(tag)),
        }
    }

    pub fn tag(&self) -> Ref<'_, MockTag> {
        self.tag.borrow()
    }

    pub fn tag_mut(&self) -> RefMut<'_, MockTag> {
        self.tag.borrow_mut()
    }

    pub fn take_reply(&self) -> Option<Result<Vec<u8>>> {
        self.tag.borrow_mut().take_reply()
    }

    pub fn sent_count(&self) -> usize {
        self.tag.borrow().sent.len()
    }
}

impl Transport for MockTransport {
    fn transceive(&mut self, request: &Request) -> Result<()> {
        self.tag.borrow_mut().submit(request)
    }
}
