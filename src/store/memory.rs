use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{FnvIndexMap, Vec};

use super::{BLOCK_SIZE, ConfigStore, StoreError, StoreKey};

type Block = Vec<u8, BLOCK_SIZE>;

struct Blocks<const SLOTS: usize> {
    blocks: FnvIndexMap<u32, Block, SLOTS>,
    writes: u32,
}

/// RAM-backed [`ConfigStore`].
///
/// Used on hosts and in tests, and as a write-through cache in front of
/// flash. Rewriting a block with identical contents is skipped and not
/// counted, the same way a flash-backed store spares erase cycles.
///
/// `SLOTS` must be a power of two.
pub struct MemoryStore<const SLOTS: usize = 16> {
    inner: Mutex<RefCell<Blocks<SLOTS>>>,
}

impl<const SLOTS: usize> MemoryStore<SLOTS> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Blocks {
                blocks: FnvIndexMap::new(),
                writes: 0,
            })),
        }
    }

    /// Number of writes that reached the medium.
    pub fn write_count(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().writes)
    }

    pub fn contains(&self, key: StoreKey) -> bool {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .borrow()
                .blocks
                .contains_key(&key.block_id())
        })
    }
}

impl<const SLOTS: usize> Default for MemoryStore<SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SLOTS: usize> ConfigStore for MemoryStore<SLOTS> {
    fn get(&self, key: StoreKey, buf: &mut [u8]) -> Option<usize> {
        critical_section::with(|cs| {
            let inner = self.inner.borrow(cs).borrow();
            let block = inner.blocks.get(&key.block_id())?;
            let target = buf.get_mut(..block.len())?;
            target.copy_from_slice(block);
            Some(block.len())
        })
    }

    fn put(&self, key: StoreKey, data: &[u8]) -> Result<(), StoreError> {
        let block = Block::from_slice(data).map_err(|()| StoreError::TooLarge)?;
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow(cs).borrow_mut();
            let id = key.block_id();
            if inner.blocks.get(&id).is_some_and(|stored| stored[..] == block[..]) {
                return Ok(());
            }
            inner
                .blocks
                .insert(id, block)
                .map_err(|_| StoreError::Full)?;
            inner.writes += 1;
            Ok(())
        })
    }

    fn remove(&self, key: StoreKey) {
        critical_section::with(|cs| {
            self.inner.borrow(cs).borrow_mut().blocks.remove(&key.block_id());
        });
    }
}
