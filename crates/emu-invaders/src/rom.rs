//! ROM images and their placement in the address space.

use std::fs;
use std::path::Path;

use emu_core::{MEMORY_SIZE, Memory};

use crate::error::RomError;

/// Size of each of the four game ROMs.
pub const ROM_SIZE: usize = 0x800;

/// File names and load addresses of the game ROMs, in load order.
const INVADERS_LAYOUT: [(&str, u16); 4] = [
    ("invaders.h", 0x0000),
    ("invaders.g", 0x0800),
    ("invaders.f", 0x1000),
    ("invaders.e", 0x1800),
];

/// One ROM image and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomImage {
    pub name: String,
    pub offset: u16,
    pub data: Vec<u8>,
}

/// A set of ROM images checked to fit the 64 KiB address space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomSet {
    images: Vec<RomImage>,
}

impl RomSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image. Fails if it would run past 0xFFFF.
    pub fn push(&mut self, image: RomImage) -> Result<(), RomError> {
        if usize::from(image.offset) + image.data.len() > MEMORY_SIZE {
            return Err(RomError::Overflow {
                name: image.name,
                offset: image.offset,
                len: image.data.len(),
            });
        }
        self.images.push(image);
        Ok(())
    }

    /// The four 2 KiB game ROMs at 0x0000, 0x0800, 0x1000 and 0x1800.
    pub fn invaders(h: Vec<u8>, g: Vec<u8>, f: Vec<u8>, e: Vec<u8>) -> Result<Self, RomError> {
        let mut set = Self::new();
        for ((name, offset), data) in INVADERS_LAYOUT.into_iter().zip([h, g, f, e]) {
            if data.len() != ROM_SIZE {
                return Err(RomError::WrongSize {
                    name: name.to_string(),
                    expected: ROM_SIZE,
                    actual: data.len(),
                });
            }
            set.push(RomImage {
                name: name.to_string(),
                offset,
                data,
            })?;
        }
        Ok(set)
    }

    /// Read `invaders.h`, `.g`, `.f` and `.e` from a directory.
    pub fn from_dir(dir: &Path) -> Result<Self, RomError> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read(&path).map_err(|source| RomError::Io { path, source })
        };
        let [h, g, f, e] = INVADERS_LAYOUT.map(|(name, _)| read(name));
        let set = Self::invaders(h?, g?, f?, e?)?;
        log::info!("loaded {} ROM images from {}", set.images.len(), dir.display());
        Ok(set)
    }

    #[must_use]
    pub fn images(&self) -> &[RomImage] {
        &self.images
    }

    /// Copy every image into memory.
    pub fn load_into(&self, memory: &mut Memory) {
        for image in &self.images {
            log::debug!(
                "{}: {} bytes at {:#06X}",
                image.name,
                image.data.len(),
                image.offset
            );
            memory.load(image.offset, &image.data);
        }
    }
}
