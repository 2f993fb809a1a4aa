//! Memory bus: routes word accesses to page-granular regions.
//!
//! A registration maps `[start*page_size, (start+pages)*page_size)` onto one
//! region. Registrations are scanned in insertion order and the first match
//! wins, so overlapping ranges shadow later ones; callers are expected to
//! register disjoint ranges. The bus itself does no buffering, caching, or
//! alignment checking — alignment policy belongs to the region adapter.

use stackvm_spec::{Address, Fault, Word, DEFAULT_PAGE_SIZE};

/// A backing region adapter: the read/write pair behind one mapped range.
///
/// Offsets are region-local byte addresses, already translated by the bus.
pub trait Region {
    /// Read one word at a region-local offset.
    fn read(&mut self, offset: Address) -> Result<Word, Fault>;

    /// Write one word at a region-local offset.
    fn write(&mut self, offset: Address, word: Word) -> Result<(), Fault>;
}

struct PageRegistration {
    start_page: u32,
    pages: u32,
    region: Box<dyn Region>,
}

/// Address-space multiplexer over an ordered list of page registrations.
pub struct MemoryBus {
    page_size: u32,
    registrations: Vec<PageRegistration>,
}

impl MemoryBus {
    /// Create a bus with the given page size in bytes.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            registrations: Vec::new(),
        }
    }

    /// Page size in bytes, fixed for the lifetime of the bus.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Append a registration covering `pages` pages from `start_page`.
    ///
    /// No overlap check is performed; an overlapping range registered later
    /// is unreachable for addresses the earlier range already covers.
    pub fn register(&mut self, start_page: u32, pages: u32, region: Box<dyn Region>) {
        tracing::debug!(start_page, pages, page_size = self.page_size, "region registered");
        self.registrations.push(PageRegistration {
            start_page,
            pages,
            region,
        });
    }

    /// Read the word at `address`, or fault if no region claims it.
    pub fn read(&mut self, address: Address) -> Result<Word, Fault> {
        let (region, offset) = self
            .resolve(address)
            .ok_or(Fault::MemoryBus { address })?;
        region.read(offset)
    }

    /// Write the word at `address`, or fault if no region claims it.
    pub fn write(&mut self, address: Address, word: Word) -> Result<(), Fault> {
        let (region, offset) = self
            .resolve(address)
            .ok_or(Fault::MemoryBus { address })?;
        region.write(offset, word)
    }

    // Range arithmetic runs in u64 so a registration reaching the top of the
    // address space does not wrap its end bound back to zero.
    fn resolve(&mut self, address: Address) -> Option<(&mut dyn Region, Address)> {
        let addr = address as u64;
        for registration in &mut self.registrations {
            let start = registration.start_page as u64 * self.page_size as u64;
            let end = start + registration.pages as u64 * self.page_size as u64;
            if start <= addr && addr < end {
                return Some((registration.region.as_mut(), (addr - start) as Address));
            }
        }
        None
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    // Records every translated offset it is handed.
    struct ProbeRegion {
        log: Rc<RefCell<Vec<Address>>>,
        value: Word,
    }

    impl Region for ProbeRegion {
        fn read(&mut self, offset: Address) -> Result<Word, Fault> {
            self.log.borrow_mut().push(offset);
            Ok(self.value)
        }

        fn write(&mut self, offset: Address, _word: Word) -> Result<(), Fault> {
            self.log.borrow_mut().push(offset);
            Ok(())
        }
    }

    fn probe(value: Word) -> (ProbeRegion, Rc<RefCell<Vec<Address>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (
            ProbeRegion {
                log: Rc::clone(&log),
                value,
            },
            log,
        )
    }

    #[test]
    fn test_routes_with_translated_offset() {
        let mut bus = MemoryBus::new(0x400);
        let (region, log) = probe(7);
        bus.register(2, 1, Box::new(region));

        assert_eq!(bus.read(0x800), Ok(7));
        assert_eq!(bus.read(0xBFC), Ok(7));
        bus.write(0x804, 0).unwrap();

        assert_eq!(*log.borrow(), vec![0x000, 0x3FC, 0x004]);
    }

    #[test]
    fn test_unmapped_address_faults() {
        let mut bus = MemoryBus::new(0x400);
        let (region, _) = probe(0);
        bus.register(0, 1, Box::new(region));

        assert_eq!(
            bus.read(0x400),
            Err(Fault::MemoryBus { address: 0x400 })
        );
        assert_eq!(
            bus.write(0x400, 1),
            Err(Fault::MemoryBus { address: 0x400 })
        );
    }

    #[test]
    fn test_empty_bus_faults_everywhere() {
        let mut bus = MemoryBus::default();
        assert_eq!(bus.read(0), Err(Fault::MemoryBus { address: 0 }));
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let mut bus = MemoryBus::new(0x400);
        let (first, first_log) = probe(1);
        let (second, second_log) = probe(2);
        bus.register(0, 2, Box::new(first));
        bus.register(1, 1, Box::new(second));

        // Page 1 is claimed by both; the earlier registration shadows.
        assert_eq!(bus.read(0x400), Ok(1));
        assert_eq!(*first_log.borrow(), vec![0x400]);
        assert!(second_log.borrow().is_empty());
    }

    #[test]
    fn test_registration_at_top_of_address_space() {
        let pages = (Word::MAX as u64 + 1).div_ceil(0x400) as u32;
        let mut bus = MemoryBus::new(0x400);
        let (region, _) = probe(9);
        bus.register(0, pages, Box::new(region));

        assert_eq!(bus.read(Word::MAX & !0x3), Ok(9));
    }

    #[test]
    fn test_default_page_size() {
        assert_eq!(MemoryBus::default().page_size(), DEFAULT_PAGE_SIZE);
    }
}
