use crate::error::Error;

/**
 * Monotonic key allocator.
 *
 * The watermark records the highest integer key ever assigned, whether it was
 * generated here or supplied by the caller. It never decreases, so keys freed
 * by deletion are not handed out again. This keeps old and new elements from
 * aliasing each other across a delete.
 */
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct KeyGen {
    watermark: Option<u32>,
}

impl KeyGen {
    /// Allocate the next key and advance the watermark.
    pub fn next(&mut self) -> u32 {
        let key = match self.watermark {
            Some(mark) => mark + 1,
            None => 0,
        };
        self.watermark = Some(key);
        key
    }

    /// Record an explicitly supplied key, raising the watermark if needed.
    pub fn claim(&mut self, key: u32) {
        match self.watermark {
            Some(mark) if mark >= key => {}
            _ => self.watermark = Some(key),
        }
    }

    pub fn watermark(&self) -> Option<u32> {
        self.watermark
    }

    /// The serialized watermark: -1 when no key was ever assigned.
    pub fn to_serial(self) -> i64 {
        match self.watermark {
            Some(mark) => mark as i64,
            None => -1,
        }
    }

    pub fn from_serial(mark: i64) -> Result<Self, Error> {
        match mark {
            -1 => Ok(KeyGen { watermark: None }),
            mark if (0..=(u32::MAX as i64)).contains(&mark) => Ok(KeyGen {
                watermark: Some(mark as u32),
            }),
            mark => Err(Error::InvalidData(format!(
                "key watermark out of range: {}",
                mark
            ))),
        }
    }
}
