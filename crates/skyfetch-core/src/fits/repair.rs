use std::borrow::Cow;

use crate::consts::{FITS_BLOCK_SIZE, FITS_CARD_SIZE};

const END_CARD: &[u8] = b"END";

/// Close headers that lack an `END` card and pad the stream to whole blocks.
///
/// Header starts are the beginning of the stream and every block that opens
/// with `XTENSION`. A header without `END` stops at the first following block
/// that is not text, at the next header, or at end of stream.
///
/// Returns the normalized bytes and the length of real content in them
/// (the zero padding added here excluded).
pub(crate) fn normalize<'a>(buf: &'a [u8], warnings: &mut Vec<String>) -> (Cow<'a, [u8]>, usize) {
    let starts = header_starts(buf);
    let mut out: Option<Vec<u8>> = None;
    let mut copied = 0;

    for (i, &start) in starts.iter().enumerate() {
        let limit = starts.get(i + 1).copied().unwrap_or(buf.len());
        let Some(stop) = missing_end(buf, start, limit) else {
            continue;
        };
        warnings.push(format!("header at byte {start} has no END card"));

        let fixed = out.get_or_insert_with(Vec::new);
        fixed.extend_from_slice(&buf[copied..start]);
        for card in buf[start..stop].chunks(FITS_CARD_SIZE) {
            if !card.iter().all(|&b| b == b' ') {
                fixed.extend_from_slice(card);
                fixed.resize(fixed.len() + FITS_CARD_SIZE - card.len(), b' ');
            }
        }
        fixed.extend_from_slice(END_CARD);
        fixed.resize(fixed.len() + FITS_CARD_SIZE - END_CARD.len(), b' ');
        let rem = fixed.len() % FITS_BLOCK_SIZE;
        if rem != 0 {
            fixed.resize(fixed.len() + FITS_BLOCK_SIZE - rem, b' ');
        }
        copied = stop;
    }

    let mut bytes = match out {
        Some(mut fixed) => {
            fixed.extend_from_slice(&buf[copied..]);
            Cow::Owned(fixed)
        }
        None => Cow::Borrowed(buf),
    };

    let content_len = bytes.len();
    let rem = content_len % FITS_BLOCK_SIZE;
    if rem != 0 {
        warnings.push("stream is missing its trailing block padding".to_string());
        bytes.to_mut().resize(content_len + FITS_BLOCK_SIZE - rem, 0);
    }
    (bytes, content_len)
}

fn header_starts(buf: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        (FITS_BLOCK_SIZE..buf.len())
            .step_by(FITS_BLOCK_SIZE)
            .filter(|&off| buf[off..].starts_with(b"XTENSION")),
    );
    starts
}

/// Where the header at `start` stops if it has no `END` card, or `None`.
fn missing_end(buf: &[u8], start: usize, limit: usize) -> Option<usize> {
    let mut pos = start;
    while pos + FITS_CARD_SIZE <= limit {
        let card = &buf[pos..pos + FITS_CARD_SIZE];
        if pos > start && (pos - start) % FITS_BLOCK_SIZE == 0 && !is_text(card) {
            return Some(pos);
        }
        if card.starts_with(END_CARD) && card[END_CARD.len()..8].iter().all(|&b| b == b' ') {
            return None;
        }
        pos += FITS_CARD_SIZE;
    }
    Some(limit)
}

fn is_text(card: &[u8]) -> bool {
    card.iter().all(|b| (0x20..=0x7e).contains(b))
}
