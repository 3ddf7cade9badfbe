use crate::utils::{encode_base, BASES};

/// Majority-vote motif across equal-length instances. Ties go to the base
/// that comes first in A, C, G, T order; characters outside the alphabet
/// are not counted.
pub fn majority<S: AsRef<str>>(instances: &[S]) -> String {
    let Some(first) = instances.first() else {
        return String::new();
    };
    let motif_len = first.as_ref().len();

    //                                     A  C  G  T
    let mut counts = vec![[0usize; 4]; motif_len];
    for instance in instances {
        let instance = instance.as_ref().as_bytes();
        debug_assert_eq!(instance.len(), motif_len);
        for (row, &base) in counts.iter_mut().zip(instance) {
            if let Some(index) = encode_base(base) {
                row[index as usize] += 1;
            }
        }
    }

    counts
        .iter()
        .map(|row| {
            let mut best = 0;
            for index in 1..4 {
                if row[index] > row[best] {
                    best = index;
                }
            }
            BASES[best] as char
        })
        .collect()
}
