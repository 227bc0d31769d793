//! File codecs and well-known pattern constructors
//!
//! Two on-disk formats are supported:
//!
//! - **ascii**: a header line `"<width> <height>"` followed by `height`
//!   newline-terminated rows of `width` characters, `' '` dead and `'#'`
//!   alive.
//! - **binary**: a 4-byte little-endian width, a 4-byte little-endian
//!   height, then the cells row-major as a bitstream packed LSB-first per
//!   byte, the final byte zero-padded.

use crate::error::{Error, Result};
use crate::grid::{Cell, Grid};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Load a grid from an ascii file
///
/// The parser is strict about content: a row whose length differs from
/// `width`, an unrecognized character, or fewer than `height` rows all
/// fail with [`Error::Format`]. Line endings are tolerated leniently (a
/// trailing `'\r'` is stripped before the row is read).
pub fn load_ascii<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let mut header = String::new();
    reader.read_line(&mut header)?;
    let (width, height) = parse_ascii_header(&header)?;

    let mut grid = Grid::with_size(width, height);
    let mut line = String::new();
    for y in 0..height {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(Error::Format(format!(
                "not enough lines: expected {height} rows, got {y}"
            )));
        }
        let row = line.trim_end_matches(['\n', '\r']);
        let mut chars = row.chars();
        for x in 0..width {
            let c = chars
                .next()
                .ok_or_else(|| Error::Format(format!("line ends unexpectedly in row {y}")))?;
            let cell = Cell::from_char(c).ok_or_else(|| {
                Error::Format(format!("unknown character {c:?} at ({x}, {y})"))
            })?;
            grid.set(x, y, cell)?;
        }
        if chars.next().is_some() {
            return Err(Error::Format(format!(
                "line ends unexpectedly in row {y}: longer than width {width}"
            )));
        }
    }
    debug!("loaded {}x{} ascii grid from {}", width, height, path.display());
    Ok(grid)
}

fn parse_ascii_header(header: &str) -> Result<(usize, usize)> {
    let mut fields = header.split_whitespace().map(|field| {
        field
            .parse::<i32>()
            .map_err(|_| Error::Format(format!("bad header field {field:?}")))
    });
    let width = fields
        .next()
        .ok_or_else(|| Error::Format("missing width in header".to_string()))??;
    let height = fields
        .next()
        .ok_or_else(|| Error::Format("missing height in header".to_string()))??;
    if width < 0 || height < 0 {
        return Err(Error::Format(format!(
            "negative dimensions {width}x{height}"
        )));
    }
    Ok((width as usize, height as usize))
}

/// Save a grid to an ascii file
pub fn save_ascii<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{} {}", grid.width(), grid.height())?;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            write!(writer, "{}", grid[(x, y)].to_char())?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    debug!(
        "saved {}x{} ascii grid to {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(())
}

/// Load a grid from a binary file
pub fn load_binary<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let width = read_header_int(&mut reader)?;
    let height = read_header_int(&mut reader)?;
    if width < 0 || height < 0 {
        return Err(Error::Format(format!(
            "negative dimensions {width}x{height}"
        )));
    }
    let (width, height) = (width as usize, height as usize);

    let mut bits = Vec::new();
    reader.read_to_end(&mut bits)?;

    let mut grid = Grid::with_size(width, height);
    for i in 0..width * height {
        let byte = bits
            .get(i / 8)
            .copied()
            .ok_or_else(|| Error::Format("unexpected end of file".to_string()))?;
        grid[(i % width, i / width)] = Cell::from_bit((byte >> (i % 8)) & 1);
    }
    debug!(
        "loaded {}x{} binary grid from {}",
        width,
        height,
        path.display()
    );
    Ok(grid)
}

/// Reads one 4-byte header integer, mapping a short read to a format error
fn read_header_int<R: Read>(reader: &mut R) -> Result<i32> {
    reader.read_i32::<LittleEndian>().map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Format("unexpected end of file".to_string())
        } else {
            Error::Io(e)
        }
    })
}

/// Save a grid to a binary file
pub fn save_binary<P: AsRef<Path>>(path: P, grid: &Grid) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_i32::<LittleEndian>(grid.width() as i32)?;
    writer.write_i32::<LittleEndian>(grid.height() as i32)?;

    let total = grid.total_cells();
    let mut byte = 0u8;
    for i in 0..total {
        byte |= grid[(i % grid.width(), i / grid.width())].to_bit() << (i % 8);
        if i % 8 == 7 {
            writer.write_all(&[byte])?;
            byte = 0;
        }
    }
    if total % 8 != 0 {
        writer.write_all(&[byte])?;
    }
    writer.flush()?;
    debug!(
        "saved {}x{} binary grid to {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(())
}

/// A 3x3 glider, the smallest diagonally travelling spaceship
///
/// ```text
/// +---+
/// | # |
/// |  #|
/// |###|
/// +---+
/// ```
pub fn glider() -> Grid {
    let mut g = Grid::square(3);
    g[(1, 0)] = Cell::Alive;
    g[(2, 1)] = Cell::Alive;
    g[(0, 2)] = Cell::Alive;
    g[(1, 2)] = Cell::Alive;
    g[(2, 2)] = Cell::Alive;
    g
}

/// The 3x3 r-pentomino, a famously long-lived methuselah
///
/// ```text
/// +---+
/// | ##|
/// |## |
/// | # |
/// +---+
/// ```
pub fn r_pentomino() -> Grid {
    let mut g = Grid::square(3);
    g[(1, 0)] = Cell::Alive;
    g[(2, 0)] = Cell::Alive;
    g[(0, 1)] = Cell::Alive;
    g[(1, 1)] = Cell::Alive;
    g[(1, 2)] = Cell::Alive;
    g
}

/// A 5x4 lightweight spaceship travelling horizontally
///
/// ```text
/// +-----+
/// | #  #|
/// |#    |
/// |#   #|
/// |#### |
/// +-----+
/// ```
pub fn light_weight_spaceship() -> Grid {
    let mut g = Grid::with_size(5, 4);
    g[(1, 0)] = Cell::Alive;
    g[(4, 0)] = Cell::Alive;
    g[(0, 1)] = Cell::Alive;
    g[(0, 2)] = Cell::Alive;
    g[(4, 2)] = Cell::Alive;
    g[(0, 3)] = Cell::Alive;
    g[(1, 3)] = Cell::Alive;
    g[(2, 3)] = Cell::Alive;
    g[(3, 3)] = Cell::Alive;
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_glider_shape() {
        let g = glider();
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 3);
        assert_eq!(g, Grid::from_rows(&[" # ", "  #", "###"]).unwrap());
    }

    #[test]
    fn test_r_pentomino_shape() {
        let g = r_pentomino();
        assert_eq!(g.alive_cells(), 5);
        assert_eq!(g, Grid::from_rows(&[" ##", "## ", " # "]).unwrap());
    }

    #[test]
    fn test_light_weight_spaceship_shape() {
        let g = light_weight_spaceship();
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 4);
        assert_eq!(
            g,
            Grid::from_rows(&[" #  #", "#    ", "#   #", "#### "]).unwrap()
        );
    }

    #[test]
    fn test_save_ascii_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("glider.gol");
        save_ascii(&path, &glider()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "3 3\n # \n  #\n###\n");
    }

    #[test]
    fn test_ascii_round_trip() {
        let dir = tempdir().unwrap();
        for grid in [
            Grid::new(),
            Grid::square(3),
            Grid::from_rows(&["##", "##"]).unwrap(),
            light_weight_spaceship(),
        ] {
            let path = dir.path().join("roundtrip.gol");
            save_ascii(&path, &grid).unwrap();
            assert_eq!(load_ascii(&path).unwrap(), grid);
        }
    }

    #[test]
    fn test_load_ascii_tolerates_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crlf.gol");
        fs::write(&path, "2 2\r\n##\r\n #\r\n").unwrap();
        let grid = load_ascii(&path).unwrap();
        assert_eq!(grid, Grid::from_rows(&["##", " #"]).unwrap());
    }

    #[test]
    fn test_load_ascii_negative_width_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.gol");
        fs::write(&path, "-3 3\n   \n   \n   \n").unwrap();
        assert!(matches!(load_ascii(&path), Err(Error::Format(_))));
    }

    #[test]
    fn test_load_ascii_short_line_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.gol");
        fs::write(&path, "3 2\n###\n##\n").unwrap();
        let err = load_ascii(&path).unwrap_err();
        assert!(matches!(&err, Error::Format(msg) if msg.contains("ends unexpectedly")));
    }

    #[test]
    fn test_load_ascii_overlong_line_fails() {
        // A row longer than the declared width must not load with the
        // excess cells silently dropped.
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlong.gol");
        fs::write(&path, "3 1\n#####\n").unwrap();
        let err = load_ascii(&path).unwrap_err();
        assert!(matches!(&err, Error::Format(msg) if msg.contains("ends unexpectedly")));
    }

    #[test]
    fn test_load_ascii_unknown_character_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unknown.gol");
        fs::write(&path, "3 1\n#x#\n").unwrap();
        let err = load_ascii(&path).unwrap_err();
        assert!(matches!(&err, Error::Format(msg) if msg.contains("unknown character")));
    }

    #[test]
    fn test_load_ascii_missing_lines_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.gol");
        fs::write(&path, "2 3\n##\n##\n").unwrap();
        let err = load_ascii(&path).unwrap_err();
        assert!(matches!(&err, Error::Format(msg) if msg.contains("not enough lines")));
    }

    #[test]
    fn test_load_ascii_nonexistent_path_fails_with_io() {
        assert!(matches!(
            load_ascii("/definitely/not/here.gol"),
            Err(Error::Io(_))
        ));
        assert!(matches!(
            load_binary("/definitely/not/here.bgol"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_save_binary_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("glider.bgol");
        save_binary(&path, &glider()).unwrap();
        let bytes = fs::read(&path).unwrap();
        // 3x3 header, then bits 010 001 111 row-major, LSB-first:
        // byte 0 = 0b1110_0010, byte 1 = 0b0000_0001.
        assert_eq!(bytes, vec![3, 0, 0, 0, 3, 0, 0, 0, 0xe2, 0x01]);
    }

    #[test]
    fn test_binary_round_trip() {
        let dir = tempdir().unwrap();
        let mut all_alive = Grid::with_size(4, 5);
        for y in 0..5 {
            for x in 0..4 {
                all_alive.set(x, y, Cell::Alive).unwrap();
            }
        }
        for grid in [Grid::new(), Grid::square(3), all_alive, r_pentomino()] {
            let path = dir.path().join("roundtrip.bgol");
            save_binary(&path, &grid).unwrap();
            assert_eq!(load_binary(&path).unwrap(), grid);
        }
    }

    #[test]
    fn test_load_binary_truncated_fails() {
        let dir = tempdir().unwrap();

        // Header cut off mid-integer.
        let path = dir.path().join("header.bgol");
        fs::write(&path, [4u8, 0, 0, 0, 4]).unwrap();
        assert!(matches!(load_binary(&path), Err(Error::Format(_))));

        // 4x4 needs 2 data bytes; only one present.
        let path = dir.path().join("data.bgol");
        fs::write(&path, [4u8, 0, 0, 0, 4, 0, 0, 0, 0xff]).unwrap();
        let err = load_binary(&path).unwrap_err();
        assert!(matches!(&err, Error::Format(msg) if msg.contains("unexpected end of file")));
    }

    #[test]
    fn test_load_binary_ignores_padding_bits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("padded.bgol");
        // 2x2 grid, low 4 bits all alive, high 4 bits are padding.
        fs::write(&path, [2u8, 0, 0, 0, 2, 0, 0, 0, 0xff]).unwrap();
        let grid = load_binary(&path).unwrap();
        assert_eq!(grid.alive_cells(), 4);
    }

    #[test]
    fn test_spaceship_survives_codec_and_step() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lwss.bgol");
        let mut seed = Grid::with_size(9, 6);
        seed.merge(&light_weight_spaceship(), 2, 1, false);
        save_binary(&path, &seed).unwrap();

        let mut world = crate::World::from_grid(load_binary(&path).unwrap());
        world.advance(4, false);
        // An LWSS relocates two cells along its travel axis every 4 steps.
        let mut expected = Grid::with_size(9, 6);
        expected.merge(&light_weight_spaceship(), 0, 1, false);
        assert_eq!(world.get_state(), &expected);
    }
}
