use std::collections::BTreeMap;

use log::{debug, warn};

use super::error::TosError;
use super::types::*;
use crate::symbols::{Section, Symbol};

/// A bounds-checked big-endian reader over part of the file.
///
/// `origin` is the file offset of `data[0]`, so errors always report
/// positions in the whole file.
struct ByteReader<'a> {
    data: &'a [u8],
    origin: usize,
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        ByteReader {
            data,
            origin: 0,
            pos: 0,
        }
    }

    fn offset(&self) -> usize {
        self.origin + self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], TosError> {
        if self.remaining() < n {
            return Err(TosError::TooShort {
                offset: self.offset(),
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, TosError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16_be(&mut self) -> Result<u16, TosError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32_be(&mut self) -> Result<u32, TosError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Split off the next `n` bytes as their own reader.
    fn sub_reader(&mut self, n: usize) -> Result<ByteReader<'a>, TosError> {
        let origin = self.offset();
        let data = self.read_bytes(n)?;
        Ok(ByteReader {
            data,
            origin,
            pos: 0,
        })
    }

    fn align_to_word(&mut self) {
        if self.offset() % 2 != 0 {
            self.pos = (self.pos + 1).min(self.data.len());
        }
    }

    /// Read a debug-info string: a length in longwords, then the bytes.
    /// Padding zeros are dropped.
    fn read_debug_string(&mut self) -> Result<String, TosError> {
        let num_longs = self.read_u32_be()?;
        // Sanity check: filenames shouldn't be megabytes long
        if num_longs > 0x10000 {
            return Err(TosError::InvalidStringLength {
                length: num_longs,
                offset: self.offset() - 4,
            });
        }
        let bytes = self.read_bytes(num_longs as usize * 4)?;
        let text: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
        Ok(String::from_utf8_lossy(&text).into_owned())
    }
}

/// Parse a complete Atari TOS program (`.prg`, `.tos`, `.ttp`) from raw bytes.
///
/// Loads the text and data images, the DRI symbol table, the relocation
/// stream and any line-number debug hunks appended after it. Damage in the
/// relocation stream or the debug hunks is logged and ends that part of the
/// load; the program itself is still returned.
///
/// # Example
///
/// ```no_run
/// use motodis::tos::parse_tos;
///
/// let file_data = std::fs::read("program.prg").unwrap();
/// let program = parse_tos(&file_data).unwrap();
/// println!("text: {} bytes, {} symbols", program.text.len(), program.symbols.len());
/// ```
pub fn parse_tos(data: &[u8]) -> Result<TosProgram, TosError> {
    let mut reader = ByteReader::new(data);

    let branch = reader.read_u16_be()?;
    if branch != TOS_MAGIC {
        return Err(TosError::BadMagic { found: branch });
    }
    let header = TosHeader {
        branch,
        text_len: reader.read_u32_be()?,
        data_len: reader.read_u32_be()?,
        bss_len: reader.read_u32_be()?,
        symbol_len: reader.read_u32_be()?,
        reserved: reader.read_u32_be()?,
        prg_flags: reader.read_u32_be()?,
        abs_flag: reader.read_u16_be()?,
    };
    debug!(
        "tos header: text {} bytes, data {} bytes, bss {} bytes, symbols {} bytes, flags ${:x}",
        header.text_len, header.data_len, header.bss_len, header.symbol_len, header.prg_flags
    );

    let text = reader.read_bytes(header.text_len as usize)?.to_vec();
    let data_image = reader.read_bytes(header.data_len as usize)?.to_vec();

    let mut symbol_reader = reader.sub_reader(header.symbol_len as usize)?;
    let symbols = parse_dri_symbols(&mut symbol_reader, &header)?;
    debug!("read {} symbols", symbols.len());

    let mut image = Vec::with_capacity(text.len() + data_image.len());
    image.extend_from_slice(&text);
    image.extend_from_slice(&data_image);

    let mut relocations = BTreeMap::new();
    if let Err(err) = parse_relocations(&mut reader, &image, &mut relocations) {
        warn!("relocation stream: {err}");
    }
    debug!("read {} relocations", relocations.len());

    let mut lines = LineTable::new();
    reader.align_to_word();
    if let Err(err) = parse_debug_hunks(&mut reader, &mut lines) {
        warn!("{err}; ignoring remaining debug information");
    }
    if !lines.is_empty() {
        debug!(
            "read {} line entries for {} files",
            lines.len(),
            lines.filenames.len()
        );
    }

    Ok(TosProgram {
        header,
        text,
        data: data_image,
        symbols,
        relocations,
        lines,
    })
}

/// Parse DRI symbol records until fewer than one record remains.
fn parse_dri_symbols(reader: &mut ByteReader<'_>, header: &TosHeader) -> Result<Vec<Symbol>, TosError> {
    let mut symbols = Vec::new();
    while reader.remaining() >= dri::RECORD_SIZE {
        let mut name = reader.read_bytes(dri::NAME_SIZE)?.to_vec();
        let id = reader.read_u16_be()?;
        let value = reader.read_u32_be()?;
        if id & dri::EXT_SYMBOL_FLAG != 0 {
            name.extend_from_slice(reader.read_bytes(dri::EXT_NAME_SIZE)?);
        }
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        let label = String::from_utf8_lossy(&name[..end]).into_owned();

        let (section, base) = match id & dri::SECTION_MASK {
            dri::SECTION_TEXT => (Section::Text, header.text_address()),
            dri::SECTION_DATA => (Section::Data, header.data_address()),
            dri::SECTION_BSS => (Section::Bss, header.bss_address()),
            _ => {
                warn!("skipping symbol {label:?} with unknown section id ${id:04x}");
                continue;
            }
        };
        symbols.push(Symbol::new(label, section, value.wrapping_add(base)));
    }
    Ok(symbols)
}

/// Walk the relocation stream, recording each relocated offset together
/// with the longword stored there in the text+data image.
fn parse_relocations(
    reader: &mut ByteReader<'_>,
    image: &[u8],
    relocations: &mut BTreeMap<u32, u32>,
) -> Result<(), TosError> {
    if reader.remaining() == 0 {
        return Ok(());
    }
    // A zero first offset means no relocations
    let mut offset = reader.read_u32_be()?;
    if offset == 0 {
        return Ok(());
    }
    record_relocation(image, offset, relocations);
    loop {
        match reader.read_u8()? {
            0 => break,
            1 => offset = offset.wrapping_add(254),
            step => {
                offset = offset.wrapping_add(step as u32);
                record_relocation(image, offset, relocations);
            }
        }
    }
    Ok(())
}

fn record_relocation(image: &[u8], offset: u32, relocations: &mut BTreeMap<u32, u32>) {
    let start = offset as usize;
    match image.get(start..start.saturating_add(4)) {
        Some(b) if b.len() == 4 => {
            relocations.insert(offset, u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
        }
        _ => warn!("relocation at ${offset:x} is outside the program image"),
    }
}

/// Parse the debug hunks that may follow the relocation stream.
fn parse_debug_hunks(reader: &mut ByteReader<'_>, lines: &mut LineTable) -> Result<(), TosError> {
    let mut got_header = false;
    while reader.remaining() >= 4 {
        let start = reader.offset();
        let magic = reader.read_u32_be()?;
        // Trailing padding after the header block
        if magic == 0 && got_header {
            break;
        }
        if magic != debug_ids::HUNK_DEBUG {
            return Err(TosError::BadDebugMagic {
                found: magic,
                offset: start,
            });
        }
        let len = reader.read_u32_be()? as usize * 4;
        let mut hunk = reader.sub_reader(len)?;
        let pc_offset = hunk.read_u32_be()?;
        let kind = hunk.read_u32_be()?;
        match kind {
            debug_ids::HEAD => {
                debug!("debug hunk HEAD at ${start:x}");
                got_header = true;
            }
            debug_ids::LINE => {
                debug!("debug hunk LINE at ${start:x}");
                parse_line_hunk(&mut hunk, lines, pc_offset)?;
            }
            debug_ids::HCLN => {
                debug!("debug hunk HCLN at ${start:x}");
                parse_hcln_hunk(&mut hunk, lines, pc_offset)?;
            }
            _ => {
                return Err(TosError::UnknownDebugHunk {
                    kind,
                    offset: start,
                })
            }
        }
    }
    Ok(())
}

/// LINE: filename, then uncompressed (line, pc) longword pairs filling
/// the rest of the hunk.
fn parse_line_hunk(hunk: &mut ByteReader<'_>, lines: &mut LineTable, pc_offset: u32) -> Result<(), TosError> {
    let name = hunk.read_debug_string()?;
    let file_index = lines.add_filename(name);
    while hunk.remaining() >= 8 {
        let line = hunk.read_u32_be()?;
        let pc = hunk.read_u32_be()?;
        lines.add(file_index, line, pc.wrapping_add(pc_offset));
    }
    Ok(())
}

/// HCLN: filename, entry count, then (line, pc) deltas.
fn parse_hcln_hunk(hunk: &mut ByteReader<'_>, lines: &mut LineTable, pc_offset: u32) -> Result<(), TosError> {
    let name = hunk.read_debug_string()?;
    let file_index = lines.add_filename(name);
    let count = hunk.read_u32_be()?;
    let mut line = 0u32;
    let mut pc = pc_offset;
    for _ in 0..count {
        line = line.wrapping_add(read_hcln_value(hunk)?);
        pc = pc.wrapping_add(read_hcln_value(hunk)?);
        lines.add(file_index, line, pc);
    }
    Ok(())
}

/// A nonzero byte, else a nonzero word, else a longword.
fn read_hcln_value(hunk: &mut ByteReader<'_>) -> Result<u32, TosError> {
    let b = hunk.read_u8()?;
    if b != 0 {
        return Ok(b as u32);
    }
    let w = hunk.read_u16_be()?;
    if w != 0 {
        return Ok(w as u32);
    }
    hunk.read_u32_be()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a TOS program image in memory.
    struct ProgramBuilder {
        text: Vec<u8>,
        data: Vec<u8>,
        bss_len: u32,
        symbols: Vec<u8>,
        tail: Vec<u8>,
    }

    impl ProgramBuilder {
        fn new(text: &[u8]) -> Self {
            ProgramBuilder {
                text: text.to_vec(),
                data: Vec::new(),
                bss_len: 0,
                symbols: Vec::new(),
                tail: vec![0, 0, 0, 0],
            }
        }

        fn symbol(mut self, name: &str, id: u16, value: u32) -> Self {
            let mut raw = [0u8; 8];
            raw[..name.len()].copy_from_slice(name.as_bytes());
            self.symbols.extend_from_slice(&raw);
            self.symbols.extend_from_slice(&id.to_be_bytes());
            self.symbols.extend_from_slice(&value.to_be_bytes());
            self
        }

        fn build(&self) -> Vec<u8> {
            let mut out = Vec::new();
            out.extend_from_slice(&TOS_MAGIC.to_be_bytes());
            out.extend_from_slice(&(self.text.len() as u32).to_be_bytes());
            out.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
            out.extend_from_slice(&self.bss_len.to_be_bytes());
            out.extend_from_slice(&(self.symbols.len() as u32).to_be_bytes());
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&0u16.to_be_bytes());
            out.extend_from_slice(&self.text);
            out.extend_from_slice(&self.data);
            out.extend_from_slice(&self.symbols);
            out.extend_from_slice(&self.tail);
            out
        }
    }

    fn debug_hunk(kind: &[u8; 4], pc_offset: u32, body: &[u8]) -> Vec<u8> {
        let mut content = Vec::new();
        content.extend_from_slice(&pc_offset.to_be_bytes());
        content.extend_from_slice(kind);
        content.extend_from_slice(body);
        while content.len() % 4 != 0 {
            content.push(0);
        }
        let mut out = Vec::new();
        out.extend_from_slice(&debug_ids::HUNK_DEBUG.to_be_bytes());
        out.extend_from_slice(&((content.len() / 4) as u32).to_be_bytes());
        out.extend_from_slice(&content);
        out
    }

    #[test]
    fn parse_minimal_program() {
        let exe = ProgramBuilder::new(&[0x4E, 0x75]).build();
        let program = parse_tos(&exe).unwrap();
        assert_eq!(program.header.text_len, 2);
        assert_eq!(program.text, [0x4E, 0x75]);
        assert!(program.symbols.is_empty());
        assert!(program.relocations.is_empty());
        assert!(program.lines.is_empty());
    }

    #[test]
    fn bad_magic() {
        let mut exe = ProgramBuilder::new(&[0x4E, 0x75]).build();
        exe[0] = 0x00;
        assert_eq!(
            parse_tos(&exe).unwrap_err(),
            TosError::BadMagic { found: 0x001A }
        );
    }

    #[test]
    fn truncated_text() {
        let mut exe = ProgramBuilder::new(&[0x4E, 0x75, 0x4E, 0x71]).build();
        exe.truncate(HEADER_SIZE + 2);
        assert!(matches!(
            parse_tos(&exe),
            Err(TosError::TooShort { offset: 28, needed: 4, available: 2 })
        ));
    }

    #[test]
    fn symbols_are_section_relative() {
        let mut builder = ProgramBuilder::new(&[0x4E, 0x75, 0x4E, 0x71])
            .symbol("_main", dri::SECTION_TEXT, 2)
            .symbol("_buf", dri::SECTION_BSS, 0)
            .symbol("_tab", dri::SECTION_DATA, 1)
            .symbol("equ", 0x4000, 7);
        builder.data = vec![0; 6];
        builder.bss_len = 16;
        let program = parse_tos(&builder.build()).unwrap();

        let found: Vec<_> = program
            .symbols
            .iter()
            .map(|s| (s.label.as_str(), s.section, s.address))
            .collect();
        assert_eq!(
            found,
            [
                ("_main", Section::Text, 2),
                ("_buf", Section::Bss, 10),
                ("_tab", Section::Data, 5),
            ]
        );
    }

    #[test]
    fn extended_symbol_names() {
        let mut builder = ProgramBuilder::new(&[0x4E, 0x75]);
        builder = builder.symbol("long_sym", dri::SECTION_TEXT | 0x0048, 0);
        builder.symbols.extend_from_slice(b"bol_name\0\0\0\0\0\0");
        let program = parse_tos(&builder.build()).unwrap();
        assert_eq!(program.symbols[0].label, "long_symbol_name");
    }

    #[test]
    fn relocation_stream() {
        // move.l #$0000000a,d0 ; nop ; lea $00000000,a0 (abs long at 8)
        let text = [
            0x20, 0x3C, 0x00, 0x00, 0x00, 0x0A, 0x4E, 0x71, 0x41, 0xF9, 0x00, 0x00, 0x00, 0x00,
        ];
        let mut builder = ProgramBuilder::new(&text);
        // first at 2, then +8 -> 10
        builder.tail = vec![0, 0, 0, 2, 8, 0];
        let program = parse_tos(&builder.build()).unwrap();
        assert_eq!(program.relocations.get(&2), Some(&0x0A));
        assert_eq!(program.relocations.get(&10), Some(&0));
        assert_eq!(program.relocations.len(), 2);

        let table = program.symbol_table();
        assert_eq!(table.find_reloc(2), Some(0x0A));
    }

    #[test]
    fn relocation_skip_254() {
        let text = vec![0u8; 300];
        let mut builder = ProgramBuilder::new(&text);
        builder.tail = vec![0, 0, 0, 4, 1, 2, 0];
        let program = parse_tos(&builder.build()).unwrap();
        let offsets: Vec<_> = program.relocations.keys().copied().collect();
        assert_eq!(offsets, [4, 260]);
    }

    #[test]
    fn line_debug_hunks() {
        let mut tail = vec![0, 0, 0, 0];
        tail.extend(debug_hunk(b"HEAD", 0, &[]));

        let mut body = Vec::new();
        body.extend_from_slice(&2u32.to_be_bytes());
        body.extend_from_slice(b"main.c\0\0");
        body.extend_from_slice(&10u32.to_be_bytes());
        body.extend_from_slice(&0u32.to_be_bytes());
        body.extend_from_slice(&11u32.to_be_bytes());
        body.extend_from_slice(&2u32.to_be_bytes());
        tail.extend(debug_hunk(b"LINE", 0x100, &body));
        tail.extend_from_slice(&[0, 0, 0, 0]);

        let mut builder = ProgramBuilder::new(&[0x4E, 0x71, 0x4E, 0x75]);
        builder.tail = tail;
        let program = parse_tos(&builder.build()).unwrap();
        assert_eq!(program.lines.filenames, ["main.c"]);
        let info = program.lines.find(0x102).unwrap();
        assert_eq!((info.file_index, info.line), (0, 11));
        assert_eq!(program.lines.find(0x100).unwrap().line, 10);
    }

    #[test]
    fn hcln_deltas() {
        let mut body = Vec::new();
        body.extend_from_slice(&1u32.to_be_bytes());
        body.extend_from_slice(b"a.s\0");
        body.extend_from_slice(&3u32.to_be_bytes());
        // line 5 at pc 0
        body.extend_from_slice(&[5, 0, 0, 0, 0, 0, 0, 0]);
        // line +1, pc +4
        body.extend_from_slice(&[1, 4]);
        // line +300 via word, pc +2
        body.extend_from_slice(&[0, 0x01, 0x2C, 2]);
        let mut tail = vec![0, 0, 0, 0];
        tail.extend(debug_hunk(b"HCLN", 0, &body));

        let mut builder = ProgramBuilder::new(&[0x4E, 0x71].repeat(8));
        builder.tail = tail;
        let program = parse_tos(&builder.build()).unwrap();
        assert_eq!(program.lines.find(0).unwrap().line, 5);
        assert_eq!(program.lines.find(4).unwrap().line, 6);
        assert_eq!(program.lines.find(6).unwrap().line, 306);
    }

    #[test]
    fn unknown_debug_hunk_keeps_program() {
        let mut tail = vec![0, 0, 0, 0];
        tail.extend(debug_hunk(b"XXXX", 0, &[]));
        let mut builder = ProgramBuilder::new(&[0x4E, 0x75]);
        builder.tail = tail;
        let program = parse_tos(&builder.build()).unwrap();
        assert_eq!(program.text, [0x4E, 0x75]);
        assert!(program.lines.is_empty());

        let mut reader = ByteReader::new(&builder.tail[4..]);
        assert!(matches!(
            parse_debug_hunks(&mut reader, &mut LineTable::new()),
            Err(TosError::UnknownDebugHunk { kind: 0x5858_5858, offset: 0 })
        ));
    }
}
