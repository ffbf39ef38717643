//! Differential tests: random operation sequences against `Vec` as the
//! naive reference model.

use advec::DynamicArray;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(u16),
    Insert(usize, u16),
    Erase(usize),
    PopBack,
    Reserve(usize),
    Resize(usize),
    Clear,
    CopyAssignFromOther,
    CopyAssignIntoOther,
    Swap,
    PushOther(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u16>().prop_map(Op::Push),
        3 => (any::<usize>(), any::<u16>()).prop_map(|(i, v)| Op::Insert(i, v)),
        2 => any::<usize>().prop_map(Op::Erase),
        1 => Just(Op::PopBack),
        1 => (0usize..64).prop_map(Op::Reserve),
        1 => (0usize..48).prop_map(Op::Resize),
        1 => Just(Op::Clear),
        2 => Just(Op::CopyAssignFromOther),
        1 => Just(Op::CopyAssignIntoOther),
        1 => Just(Op::Swap),
        2 => any::<u16>().prop_map(Op::PushOther),
    ]
}

/// Copy-assign reference: a plain clone, whatever the capacities involved.
fn naive_assign(dst: &mut Vec<String>, src: &[String]) {
    *dst = src.to_vec();
}

proptest! {
    #[test]
    fn matches_vec_reference(ops in proptest::collection::vec(op_strategy(), 0..200)) {
        let mut array: DynamicArray<String> = DynamicArray::new();
        let mut other: DynamicArray<String> = DynamicArray::new();
        let mut model: Vec<String> = Vec::new();
        let mut other_model: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::Push(v) => {
                    array.push_back(v.to_string()).unwrap();
                    model.push(v.to_string());
                }
                Op::Insert(i, v) => {
                    let at = i % (model.len() + 1);
                    prop_assert_eq!(array.insert(at, v.to_string()).unwrap(), at);
                    model.insert(at, v.to_string());
                }
                Op::Erase(i) => {
                    if !model.is_empty() {
                        let at = i % model.len();
                        prop_assert_eq!(array.erase(at), at);
                        model.remove(at);
                    }
                }
                Op::PopBack => {
                    if !model.is_empty() {
                        array.pop_back();
                        model.pop();
                    }
                }
                Op::Reserve(n) => {
                    let before = array.capacity();
                    array.reserve(n).unwrap();
                    prop_assert_eq!(array.capacity(), before.max(n));
                }
                Op::Resize(n) => {
                    array.resize(n).unwrap();
                    model.resize(n, String::new());
                }
                Op::Clear => {
                    array.clear();
                    model.clear();
                }
                Op::CopyAssignFromOther => {
                    let before = array.capacity();
                    array.assign_from(&other).unwrap();
                    naive_assign(&mut model, &other_model);
                    if other_model.len() <= before {
                        prop_assert_eq!(array.capacity(), before);
                    }
                }
                Op::CopyAssignIntoOther => {
                    other.clone_from(&array);
                    naive_assign(&mut other_model, &model);
                }
                Op::Swap => {
                    array.swap(&mut other);
                    std::mem::swap(&mut model, &mut other_model);
                }
                Op::PushOther(v) => {
                    other.push_back(v.to_string()).unwrap();
                    other_model.push(v.to_string());
                }
            }

            prop_assert_eq!(array.as_slice(), model.as_slice());
            prop_assert_eq!(other.as_slice(), other_model.as_slice());
            prop_assert!(array.len() <= array.capacity());
            prop_assert!(other.len() <= other.capacity());
        }
    }

    #[test]
    fn clone_is_independent(
        items in proptest::collection::vec(any::<i64>(), 0..64),
        extra in any::<i64>(),
    ) {
        let original = DynamicArray::from_slice(&items).unwrap();
        let mut copy = original.clone();
        copy.push_back(extra).unwrap();
        if let Some(first) = copy.first_mut() {
            *first = first.wrapping_add(1);
        }
        prop_assert_eq!(original.as_slice(), items.as_slice());
        prop_assert_eq!(copy.len(), items.len() + 1);
    }
}
