/// Properties that hold for every input:
/// - Both decoders always make progress and stay inside the buffer
/// - Consumed width matches the decoded size, or one unit on failure
/// - Decoded operands do not depend on the load address
/// - The addressing-mode matrix is total and decode_ea agrees with it
/// - Later CPU revisions decode everything earlier ones do

use motodis::dsp56::{self, DspSettings};
use motodis::m68k::addressing::{decode_ea, ea_ordinal, is_allowed, EaClass};
use motodis::m68k::{decode, CpuVariant, DecodeSettings, Instruction, Opcode, Operand, Size};
use motodis::{Cursor, DecodeError, UnitCursor, WordCursor};
use proptest::prelude::*;

fn cpu_strategy() -> impl Strategy<Value = CpuVariant> {
    prop_oneof![
        Just(CpuVariant::M68000),
        Just(CpuVariant::M68010),
        Just(CpuVariant::M68020),
        Just(CpuVariant::M68030),
    ]
}

fn size_strategy() -> impl Strategy<Value = Option<Size>> {
    prop_oneof![
        Just(None),
        Just(Some(Size::Byte)),
        Just(Some(Size::Word)),
        Just(Some(Size::Long)),
    ]
}

fn decode_one(bytes: &[u8], base: u32, cpu: CpuVariant) -> (Instruction, Result<(), DecodeError>) {
    let mut cursor = Cursor::new(bytes, base);
    let mut inst = Instruction::default();
    let res = decode(&mut inst, &mut cursor, &DecodeSettings { cpu });
    (inst, res)
}

/// Whether `op` is the operand variant the matrix row `ordinal` produces.
fn matches_row(ordinal: usize, op: &Operand) -> bool {
    matches!(
        (ordinal, op),
        (0, Operand::DataDirect(_))
            | (1, Operand::AddressDirect(_))
            | (2, Operand::Indirect(_))
            | (3, Operand::PostIncrement(_))
            | (4, Operand::PreDecrement(_))
            | (5, Operand::Displacement { .. })
            | (6, Operand::Index { .. })
            | (6, Operand::FullIndex(_))
            | (7, Operand::AbsoluteWord(_))
            | (8, Operand::AbsoluteLong(_))
            | (9, Operand::PcDisplacement { .. })
            | (10, Operand::PcIndex { .. })
            | (10, Operand::FullIndex(_))
            | (11, Operand::Immediate(_))
    )
}

// ─── 68k decoder ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn m68k_scan_makes_progress(
        bytes in proptest::collection::vec(any::<u8>(), 0..96),
        cpu in cpu_strategy(),
    ) {
        let mut cursor = Cursor::new(&bytes, 0);
        let settings = DecodeSettings { cpu };
        while cursor.remaining() >= 2 {
            let before = cursor.position();
            let mut inst = Instruction::default();
            let res = decode(&mut inst, &mut cursor, &settings);
            let after = cursor.position();
            prop_assert!(after > before);
            prop_assert!(after <= bytes.len());
            match res {
                Ok(()) => {
                    prop_assert!(inst.is_valid());
                    prop_assert_eq!(after - before, inst.size_bytes as usize);
                    prop_assert_eq!(inst.size_bytes % 2, 0);
                }
                Err(_) => {
                    prop_assert_eq!(inst.opcode, Opcode::Invalid);
                    prop_assert_eq!(after - before, 2);
                    prop_assert_eq!(inst.size_bytes, 2);
                    let header = u16::from_be_bytes([bytes[before], bytes[before + 1]]);
                    prop_assert_eq!(inst.header, header);
                }
            }
        }
    }

    #[test]
    fn m68k_decode_is_address_independent(
        bytes in proptest::collection::vec(any::<u8>(), 2..24),
        base in (0u32..0x0080_0000).prop_map(|b| b * 2),
        cpu in cpu_strategy(),
    ) {
        let (a, res_a) = decode_one(&bytes, 0, cpu);
        let (b, res_b) = decode_one(&bytes, base, cpu);
        prop_assert_eq!(res_a, res_b);
        prop_assert_eq!(a.opcode, b.opcode);
        prop_assert_eq!(a.size, b.size);
        prop_assert_eq!(a.size_bytes, b.size_bytes);
        prop_assert_eq!(&a.operands, &b.operands);
        prop_assert_eq!(b.address, base);
    }

    #[test]
    fn ea_decode_agrees_with_matrix(
        mode in 0u8..8,
        reg in 0u8..8,
        ext in proptest::collection::vec(any::<u8>(), 12),
        size in size_strategy(),
        cpu in cpu_strategy(),
    ) {
        let ordinal = ea_ordinal(mode, reg);
        prop_assert!(ordinal <= 12);
        for class in EaClass::ALL_CLASSES {
            let mut cursor = Cursor::new(&ext, 0x100);
            let res = decode_ea(&mut cursor, cpu, class, mode, reg, size, 0xFE);
            if !is_allowed(ordinal, class) {
                prop_assert_eq!(res, Err(DecodeError::IllegalAddressingMode));
            } else if let Ok(op) = res {
                prop_assert!(matches_row(ordinal, &op), "row {} gave {:?}", ordinal, op);
            }
        }
    }
}

// ─── DSP decoder ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn dsp_scan_makes_progress(words in proptest::collection::vec(0u32..0x0100_0000, 0..32)) {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()[1..].to_vec()).collect();
        let mut cursor = WordCursor::new(&bytes, 0);
        while cursor.remaining() >= 1 {
            let before = cursor.position();
            let mut inst = dsp56::Instruction::default();
            let res = dsp56::decode(&mut inst, &mut cursor, &DspSettings);
            let after = cursor.position();
            prop_assert!(after > before);
            prop_assert!(after <= words.len());
            match res {
                Ok(()) => prop_assert_eq!(after - before, inst.word_count as usize),
                Err(_) => {
                    prop_assert!(!inst.is_valid());
                    prop_assert_eq!(after - before, 1);
                    prop_assert_eq!(inst.header, words[before]);
                }
            }
        }
    }

    #[test]
    fn dsp_decode_is_address_independent(
        words in proptest::collection::vec(0u32..0x0100_0000, 1..3),
        base in 0u32..0x1_0000,
    ) {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()[1..].to_vec()).collect();
        let decode_at = |at: u32| {
            let mut cursor = WordCursor::new(&bytes, at);
            let mut inst = dsp56::Instruction::default();
            let res = dsp56::decode(&mut inst, &mut cursor, &DspSettings);
            (inst, res)
        };
        let (a, res_a) = decode_at(0);
        let (b, res_b) = decode_at(base);
        prop_assert_eq!(res_a, res_b);
        prop_assert_eq!(a.opcode, b.opcode);
        prop_assert_eq!(a.word_count, b.word_count);
        prop_assert_eq!(&a.operands, &b.operands);
        prop_assert_eq!(b.address, base);
    }
}

// ─── Matrix totality ─────────────────────────────────────────────────

#[test]
fn test_matrix_is_total() {
    for mode in 0..8u8 {
        for reg in 0..8u8 {
            let ordinal = ea_ordinal(mode, reg);
            for class in EaClass::ALL_CLASSES {
                // Every cell is defined; All covers every real mode
                let allowed = is_allowed(ordinal, class);
                if class == EaClass::All {
                    assert_eq!(allowed, ordinal != 12, "mode {mode} reg {reg}");
                }
            }
        }
    }
}

// ─── CPU revisions ───────────────────────────────────────────────────

const TIERS: [CpuVariant; 4] = [
    CpuVariant::M68000,
    CpuVariant::M68010,
    CpuVariant::M68020,
    CpuVariant::M68030,
];

#[test]
fn test_later_revisions_decode_earlier_instructions() {
    for header in 0..=u16::MAX {
        let mut bytes = header.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0x00; 10]);
        let decoded: Vec<_> = TIERS.iter().map(|&cpu| decode_one(&bytes, 0, cpu)).collect();

        for (lower, (low_inst, low_res)) in decoded.iter().enumerate() {
            if low_res.is_err() {
                continue;
            }
            // RTM and CALLM exist only on the 68020
            if matches!(low_inst.opcode, Opcode::Rtm | Opcode::Callm) {
                continue;
            }
            for (high_inst, high_res) in &decoded[lower + 1..] {
                assert_eq!(
                    *high_res,
                    Ok(()),
                    "${header:04x} decodes on {} but not on a later cpu",
                    TIERS[lower]
                );
                assert_eq!(high_inst.opcode, low_inst.opcode, "${header:04x}");
            }
        }
    }
}

#[test]
fn test_static_bit_ops_on_every_revision() {
    // BTST/BCHG/BCLR/BSET #3,(A0)
    let cases = [
        (0x0810, Opcode::Btst),
        (0x0850, Opcode::Bchg),
        (0x0890, Opcode::Bclr),
        (0x08D0, Opcode::Bset),
    ];
    for (header, opcode) in cases {
        let mut bytes = u16::to_be_bytes(header).to_vec();
        bytes.extend_from_slice(&[0x00, 0x03]);
        for cpu in TIERS {
            let (inst, res) = decode_one(&bytes, 0, cpu);
            assert_eq!(res, Ok(()), "${header:04x} on {cpu}");
            assert_eq!(inst.opcode, opcode);
            assert_eq!(inst.operands[1], Operand::Indirect(0));
            assert_eq!(inst.size_bytes, 4);
        }
    }
}
