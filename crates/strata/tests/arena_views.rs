//! Tensors viewing spans checked out of an arena.

use strata::prelude::*;

#[test]
fn tensor_over_arena_span_writes_through() {
    let mut arena = Arena::<f64>::with_capacity(32).unwrap();
    let _pad = arena.checkout(5).unwrap();
    let span = arena.checkout(12).unwrap();

    {
        let slice = arena.slice_mut(span).unwrap();
        let mut t = Tensor::assigned(slice, &[3, 4]).unwrap();
        assert!(t.is_assigned());
        for j in 0..4 {
            for i in 0..3 {
                t[[i, j]] = (10 * i + j) as f64;
            }
        }
        t.unassign().unwrap();
    }

    // (2, 3) -> 2 + 3 * 3 = 11 within the span.
    assert_eq!(arena[span.offset() + 11], 23.0);
    assert_eq!(arena.slice(span).unwrap()[4], 11.0);
}

#[test]
fn two_views_over_disjoint_spans() {
    let mut arena = Arena::<f32>::with_capacity(20).unwrap();
    let a = arena.checkout(6).unwrap();
    let b = arena.checkout(6).unwrap();

    {
        let [sa, sb] = arena.disjoint_mut([a, b]).unwrap();
        let mut ta = Tensor::assigned(sa, &[2, 3]).unwrap();
        let mut tb = Tensor::assigned(sb, &[3, 2]).unwrap();
        assert!(!same_shape(&ta, &tb));
        ta.as_mut_slice().fill(1.0);
        tb.as_mut_slice().fill(2.0);
    }

    assert_eq!(arena.slice(a).unwrap(), &[1.0; 6]);
    assert_eq!(arena.slice(b).unwrap(), &[2.0; 6]);
    assert_eq!(arena.remove(6).unwrap(), 6);
    assert_eq!(arena.remove(6).unwrap(), 0);
}

#[test]
fn arena_scenario_lifo() {
    let mut arena = Arena::<f64>::with_capacity(10).unwrap();
    arena.checkout(4).unwrap();
    arena.checkout(3).unwrap();
    assert_eq!(arena.nfree(), 3);
    arena.remove(3).unwrap();
    arena.remove(4).unwrap();
    assert_eq!(arena.nfree(), 10);
}

#[test]
fn tensor_scenario_rank_three() {
    let t = Tensor::<f64>::allocated(&[2, 3, 4]).unwrap();
    assert_eq!(t.size(), 24);
    assert_eq!(t.stride(0), Some(1));
    assert_eq!(t.stride(1), Some(2));
    assert_eq!(t.stride(2), Some(6));
    assert_eq!(t.offset_of(&[1, 2, 3]), Ok(23));
}

#[test]
fn tensor_bytes_hand_off() {
    let mut src = Tensor::<f64>::aligned(32, &[4, 2]).unwrap();
    for (i, v) in src.as_mut_slice().iter_mut().enumerate() {
        *v = i as f64 * 0.5;
    }

    // Copy through the byte span an I/O layer would see.
    let mut dst = Tensor::<f64>::allocated(&[4, 2]).unwrap();
    assert_eq!(src.byte_len(), dst.byte_len());
    dst.as_bytes_mut().copy_from_slice(src.as_bytes());

    assert!(same_shape(&src, &dst));
    assert_eq!(dst.as_slice(), src.as_slice());
}

#[test]
fn arena_errors_are_recoverable() {
    let mut arena = Arena::<f64>::new();
    let err = arena.checkout(1).unwrap_err();
    assert_eq!(err, ArenaError::Unbound { op: "checkout" });

    arena.allocate(4).unwrap();
    let err = arena.checkout(5).unwrap_err();
    assert!(err.to_string().contains("exceeds 4 free"));

    // Fall back to a heap tensor when scratch space is exhausted.
    let t = match arena.checkout(5) {
        Ok(_) => unreachable!(),
        Err(_) => Tensor::<f64>::allocated(&[5]).unwrap(),
    };
    assert_eq!(t.ownership(), Ownership::Owned);
}
