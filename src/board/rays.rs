//! Line geometry: per-square line masks, the hyperbola-quintessence ray
//! oracle, and the between-squares table.
//!
//! The hyperbola identity is used only while building (and testing) the
//! magic tables; probing at runtime goes through `attack_tables`.

use once_cell::sync::Lazy;

use super::types::{Bitboard, Square};

/// Full file mask through each square.
pub(crate) static FILE_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for (sq, slot) in masks.iter_mut().enumerate() {
        *slot = Bitboard::FILE_A.0 << (sq % 8);
    }
    masks
});

/// Full rank mask through each square.
pub(crate) static RANK_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for (sq, slot) in masks.iter_mut().enumerate() {
        *slot = Bitboard::RANK_8.0 << (8 * (sq / 8));
    }
    masks
});

/// NE-SW diagonal mask through each square.
pub(crate) static DIAG_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        let diag = Square::from_index(sq).diagonal();
        for other in 0..64 {
            if Square::from_index(other).diagonal() == diag {
                masks[sq] |= 1u64 << other;
            }
        }
    }
    masks
});

/// NW-SE anti-diagonal mask through each square.
pub(crate) static ANTI_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        let anti = Square::from_index(sq).anti_diagonal();
        for other in 0..64 {
            if Square::from_index(other).anti_diagonal() == anti {
                masks[sq] |= 1u64 << other;
            }
        }
    }
    masks
});

/// Sliding attacks along one line mask via the hyperbola quintessence
/// identity: `((o − 2r) ^ rev(rev(o) − 2·rev(r))) & m`.
#[inline]
pub(crate) fn hyperbola(sq: usize, mask: u64, occupied: u64) -> u64 {
    let r = 1u64 << sq;
    let o = occupied & mask;
    let forward = o.wrapping_sub(r.wrapping_mul(2));
    let reverse = (o.reverse_bits().wrapping_sub(r.reverse_bits().wrapping_mul(2))).reverse_bits();
    (forward ^ reverse) & mask
}

/// Rook ray attacks computed by the oracle (table construction and tests).
#[inline]
pub(crate) fn rook_rays(sq: usize, occupied: u64) -> u64 {
    hyperbola(sq, FILE_MASKS[sq] & !(1u64 << sq), occupied)
        | hyperbola(sq, RANK_MASKS[sq] & !(1u64 << sq), occupied)
}

/// Bishop ray attacks computed by the oracle.
#[inline]
pub(crate) fn bishop_rays(sq: usize, occupied: u64) -> u64 {
    hyperbola(sq, DIAG_MASKS[sq] & !(1u64 << sq), occupied)
        | hyperbola(sq, ANTI_MASKS[sq] & !(1u64 << sq), occupied)
}

/// Open ray strictly between two squares sharing a line or diagonal;
/// empty for unaligned pairs.
static BETWEEN_TABLE: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for a in 0..64 {
        for b in 0..64 {
            if a == b {
                continue;
            }
            let (sa, sb) = (Square::from_index(a), Square::from_index(b));
            let aligned = sa.row() == sb.row()
                || sa.file() == sb.file()
                || sa.diagonal() == sb.diagonal()
                || sa.anti_diagonal() == sb.anti_diagonal();
            if !aligned {
                continue;
            }
            // Each endpoint blocks the other's ray; the overlap of the two
            // blocked rays is exactly the open segment between them.
            let occ = (1u64 << a) | (1u64 << b);
            let from_a = rook_rays(a, occ) | bishop_rays(a, occ);
            let from_b = rook_rays(b, occ) | bishop_rays(b, occ);
            table[a][b] = from_a & from_b;
        }
    }
    table
});

/// The open ray between two aligned squares (exclusive of both).
#[inline]
pub(crate) fn between(a: Square, b: Square) -> Bitboard {
    Bitboard(BETWEEN_TABLE[a.index()][b.index()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_rook_rays_empty_board() {
        let e4 = sq("e4").index();
        let attacks = rook_rays(e4, 0);
        let expected = (FILE_MASKS[e4] | RANK_MASKS[e4]) & !(1u64 << e4);
        assert_eq!(attacks, expected);
    }

    #[test]
    fn test_rook_rays_with_blockers() {
        let e4 = sq("e4");
        let blockers = Bitboard::from_square(sq("e6")) | Bitboard::from_square(sq("c4"));
        let attacks = Bitboard(rook_rays(e4.index(), blockers.0));
        // Blockers are reachable, squares beyond them are not
        assert!(attacks.contains(sq("e6")));
        assert!(!attacks.contains(sq("e7")));
        assert!(attacks.contains(sq("c4")));
        assert!(!attacks.contains(sq("b4")));
        // The open rays run to the edge
        assert!(attacks.contains(sq("e1")));
        assert!(attacks.contains(sq("h4")));
    }

    #[test]
    fn test_bishop_rays_with_blockers() {
        let e4 = sq("e4");
        let blockers = Bitboard::from_square(sq("g6"));
        let attacks = Bitboard(bishop_rays(e4.index(), blockers.0));
        assert!(attacks.contains(sq("g6")));
        assert!(!attacks.contains(sq("h7")));
        assert!(attacks.contains(sq("a8")));
        assert!(attacks.contains(sq("h1")));
        assert!(attacks.contains(sq("b1")));
    }

    #[test]
    fn test_between_aligned() {
        let seg = between(sq("a1"), sq("a4"));
        assert_eq!(seg.popcount(), 2);
        assert!(seg.contains(sq("a2")));
        assert!(seg.contains(sq("a3")));

        let diag = between(sq("c1"), sq("g5"));
        assert_eq!(diag.popcount(), 3);
        assert!(diag.contains(sq("e3")));
    }

    #[test]
    fn test_between_adjacent_and_unaligned() {
        assert!(between(sq("a1"), sq("a2")).is_empty());
        assert!(between(sq("a1"), sq("b3")).is_empty());
        assert!(between(sq("e4"), sq("e4")).is_empty());
    }

    #[test]
    fn test_between_symmetry() {
        for a in 0..64 {
            for b in 0..64 {
                assert_eq!(
                    between(Square::from_index(a), Square::from_index(b)),
                    between(Square::from_index(b), Square::from_index(a))
                );
            }
        }
    }
}
