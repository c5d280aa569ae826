#![no_main]

use arbitrary::{Arbitrary, Unstructured};

use beachcomber::queue::{EventIdx, EventQueue};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Push { val: i16 },
    Pop,
    Remove { idx: usize },
}

// Entries carry a serial number, so that equal values are still told apart.
type Entry = (i16, usize);

fn arbitrary_ops(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let len = u.arbitrary_len::<Op>()?;
    let mut queue = EventQueue::<Entry>::new();
    let mut live: Vec<(EventIdx, Entry)> = Vec::new();
    for serial in 0..len {
        let op: Op = u.arbitrary()?;
        match op {
            Op::Push { val } => {
                let entry = (val, serial);
                live.push((queue.push(entry), entry));
            }
            Op::Pop => {
                let max = live.iter().map(|(_, e)| *e).max();
                assert_eq!(queue.pop(), max);
                live.retain(|(_, e)| Some(*e) != max);
            }
            Op::Remove { idx } => {
                if !live.is_empty() {
                    let (handle, entry) = live.swap_remove(idx % live.len());
                    assert_eq!(queue.remove(handle), Some(entry));
                    assert!(!queue.contains(handle));
                }
            }
        }
        queue.check_invariants();
        assert!(live.iter().all(|&(handle, _)| queue.contains(handle)));
        assert_eq!(queue.len(), live.len());
        assert_eq!(queue.peek(), live.iter().map(|(_, e)| e).max());
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = arbitrary_ops(u);
});
