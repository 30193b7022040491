use memory_space::{MemoryBlock, MemorySpace};
use quickcheck::{Arbitrary, Gen, QuickCheck};

const MAX_SIZE_LIMIT: usize = 512;

#[derive(Clone, Copy)]
enum OpTag {
    Malloc,
    Free,
    Defrag,
}

#[derive(Clone, Debug)]
enum Op {
    /// Allocate `length` words; zero is a valid (failing) request.
    Malloc { length: usize },
    /// Free an outstanding allocation.
    ///
    /// Given `n` outstanding allocations, the allocation to free is at index
    /// `index % n`.
    Free { index: usize },
    Defrag,
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        match g
            .choose(&[OpTag::Malloc, OpTag::Malloc, OpTag::Free, OpTag::Defrag])
            .unwrap()
        {
            OpTag::Malloc => Self::Malloc {
                length: usize::arbitrary(g) % (MAX_SIZE_LIMIT / 4),
            },
            OpTag::Free => Self::Free {
                index: usize::arbitrary(g),
            },
            OpTag::Defrag => Self::Defrag,
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match *self {
            Self::Malloc { length } => {
                Box::new(length.shrink().map(|length| Self::Malloc { length }))
            }
            Self::Free { index } => Box::new(index.shrink().map(|index| Self::Free { index })),
            Self::Defrag => quickcheck::empty_shrinker(),
        }
    }
}

#[derive(Clone, Debug)]
struct Params {
    max_size: usize,
}

impl Arbitrary for Params {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            max_size: usize::arbitrary(g) % MAX_SIZE_LIMIT + 1,
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(
            self.max_size
                .shrink()
                .filter(|&max_size| max_size > 0)
                .map(|max_size| Self { max_size }),
        )
    }
}

struct Checker {
    space: MemorySpace,
    allocations: Vec<MemoryBlock>,
}

impl Checker {
    fn new(params: &Params) -> Self {
        Self {
            space: MemorySpace::new(params.max_size).unwrap(),
            allocations: Vec::new(),
        }
    }

    /// Every block lies inside the space, no two blocks overlap, and together
    /// they cover the whole space.
    fn invariants_hold(&self) -> bool {
        let mut blocks: Vec<_> = self
            .space
            .free_blocks()
            .iter()
            .chain(self.space.allocated_blocks())
            .copied()
            .collect();
        blocks.sort_by_key(|block| block.base_address);

        let mut expected_base = 0;
        for block in &blocks {
            if block.length == 0 || block.base_address != expected_base {
                return false;
            }
            expected_base = block.end();
        }
        expected_base == self.space.max_size()
            && self.space.free_size() + self.space.allocated_size() == self.space.max_size()
    }

    fn do_op(&mut self, op: Op) -> bool {
        match op {
            Op::Malloc { length } => {
                let fits = self
                    .space
                    .free_blocks()
                    .iter()
                    .find(|block| block.length >= length)
                    .copied();
                match self.space.malloc(length) {
                    Some(address) => {
                        let block = MemoryBlock::new(address, length);
                        if length == 0
                            || fits.map(|b| b.base_address) != Some(address)
                            || self.space.allocated_blocks().iter().last() != Some(&block)
                        {
                            return false;
                        }
                        self.allocations.push(block);
                    }
                    None => {
                        if length != 0 && fits.is_some() {
                            return false;
                        }
                    }
                }
            }
            Op::Free { index } => {
                if self.allocations.is_empty() {
                    return true;
                }
                let index = index % self.allocations.len();
                let block = self.allocations.swap_remove(index);
                if self.space.free(block.base_address) != Some(block) {
                    return false;
                }
                if self.space.free_blocks().iter().last() != Some(&block) {
                    return false;
                }
            }
            Op::Defrag => {
                let free_size = self.space.free_size();
                self.space.defrag();
                if self.space.free_size() != free_size {
                    return false;
                }
                let free = self.space.free_blocks();
                for (i, a) in free.iter().enumerate() {
                    for b in free.iter().skip(i + 1) {
                        if a.end() == b.base_address || b.end() == a.base_address {
                            return false;
                        }
                    }
                }
            }
        }

        self.invariants_hold()
    }

    fn run(&mut self, ops: Vec<Op>) -> bool {
        if !ops.into_iter().all(|op| self.do_op(op)) {
            return false;
        }

        for block in self.allocations.drain(..) {
            if self.space.free(block.base_address).is_none() {
                return false;
            }
        }
        self.space.defrag();

        self.space.allocated_blocks().is_empty()
            && self.space.free_blocks().iter().copied().collect::<Vec<_>>()
                == [MemoryBlock::new(0, self.space.max_size())]
    }
}

#[test]
fn allocator_keeps_bookkeeping_consistent() {
    fn prop(params: Params, ops: Vec<Op>) -> bool {
        Checker::new(&params).run(ops)
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Params, Vec<Op>) -> bool);
}

#[test]
fn zero_length_malloc_never_changes_state() {
    fn prop(params: Params, ops: Vec<Op>) -> bool {
        let mut checker = Checker::new(&params);
        for op in ops {
            checker.do_op(op);
        }
        let before = checker.space.clone();
        checker.space.malloc(0).is_none() && checker.space == before
    }

    QuickCheck::new().quickcheck(prop as fn(Params, Vec<Op>) -> bool);
}
