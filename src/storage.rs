//! Persistent settings store.
//!
//! Holds the firmware's settings table and keeps values, quick-screen
//! slots and shortcuts in the nRF52840's internal flash via the
//! `sequential-storage` crate. Also runs the value editor, which borrows
//! the buttons and the screen from the UI.
//!
//! Storage layout (one map item per key):
//!   - setting id         → 4-byte little-endian `i32` value
//!   - `KEY_QUICK_SLOTS`  → 4 × `u16` setting ids, 0 for an empty slot
//!   - `KEY_SHORTCUTS`    → count byte followed by `u16` setting ids
//!
//! The flash pages are managed by `sequential-storage`, which handles wear
//! levelling and GC.

use core::cell::RefCell;
use core::fmt::Write;

use defmt::{debug, error, info, warn};
use embassy_futures::block_on;
use embedded_storage_async::nor_flash::NorFlash;
use heapless::Vec;
use menunav::config::{
    ACTION_TICK_MS, MAX_SHORTCUTS, QUICK_SLOTS, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START,
};
use menunav::menu::ContextChoice;
use menunav::settings::save_all;
use menunav::{Action, SettingDescriptor, SettingId, SettingStore};
use sequential_storage::cache::NoCache;

use crate::board::Error;
use crate::ui::buttons::ButtonPad;
use crate::ui::display::OledList;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

const KEY_QUICK_SLOTS: u16 = 0xFF00;
const KEY_SHORTCUTS: u16 = 0xFF01;

/// Largest record: the shortcuts list, 1 + 8 × 2 bytes.
const MAX_RECORD_SIZE: usize = 64;

pub const VOLUME: SettingId = SettingId(1);
pub const BASS: SettingId = SettingId(2);
pub const TREBLE: SettingId = SettingId(3);
pub const BALANCE: SettingId = SettingId(4);
pub const BACKLIGHT: SettingId = SettingId(5);
pub const CONTRAST: SettingId = SettingId(6);
pub const SCROLL_SPEED: SettingId = SettingId(7);
pub const SLEEP_TIMER: SettingId = SettingId(8);

/// A numeric setting with its range.
pub struct SettingDef {
    pub descriptor: SettingDescriptor,
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub default: i32,
    pub unit: &'static str,
}

pub const SETTING_COUNT: usize = 8;

pub static SETTINGS: [SettingDef; SETTING_COUNT] = [
    SettingDef {
        descriptor: SettingDescriptor::new(VOLUME, "Volume", "volume"),
        min: -74,
        max: 6,
        step: 1,
        default: -25,
        unit: "dB",
    },
    SettingDef {
        descriptor: SettingDescriptor::new(BASS, "Bass", "bass"),
        min: -24,
        max: 24,
        step: 1,
        default: 0,
        unit: "dB",
    },
    SettingDef {
        descriptor: SettingDescriptor::new(TREBLE, "Treble", "treble"),
        min: -24,
        max: 24,
        step: 1,
        default: 0,
        unit: "dB",
    },
    SettingDef {
        descriptor: SettingDescriptor::new(BALANCE, "Balance", "balance"),
        min: -100,
        max: 100,
        step: 5,
        default: 0,
        unit: "%",
    },
    SettingDef {
        descriptor: SettingDescriptor::new(BACKLIGHT, "Backlight", "backlight timeout"),
        min: 0,
        max: 120,
        step: 5,
        default: 15,
        unit: "s",
    },
    SettingDef {
        descriptor: SettingDescriptor::new(CONTRAST, "Contrast", "contrast"),
        min: 0,
        max: 15,
        step: 1,
        default: 8,
        unit: "",
    },
    SettingDef {
        descriptor: SettingDescriptor::new(SCROLL_SPEED, "Scroll Speed", "scroll speed").padded(),
        min: 0,
        max: 15,
        step: 1,
        default: 9,
        unit: "",
    },
    SettingDef {
        descriptor: SettingDescriptor::new(SLEEP_TIMER, "Sleep Timer", "sleep timer").temporary(),
        min: 0,
        max: 300,
        step: 5,
        default: 0,
        unit: "min",
    },
];

fn index_of(id: SettingId) -> Option<usize> {
    SETTINGS.iter().position(|d| d.descriptor.id == id)
}

/// Settings values in RAM, synced with flash.
pub struct SettingsStore<'h, F, I2C> {
    flash: F,
    values: [i32; SETTING_COUNT],
    quick: [Option<SettingId>; QUICK_SLOTS],
    shortcuts: Vec<SettingId, MAX_SHORTCUTS>,
    keys: &'h RefCell<ButtonPad>,
    screen: &'h RefCell<OledList<I2C>>,
}

impl<'h, F, I2C> SettingsStore<'h, F, I2C>
where
    F: NorFlash,
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a store holding default values.
    pub fn new(flash: F, keys: &'h RefCell<ButtonPad>, screen: &'h RefCell<OledList<I2C>>) -> Self {
        let mut values = [0; SETTING_COUNT];
        for (value, def) in values.iter_mut().zip(SETTINGS.iter()) {
            *value = def.default;
        }
        Self {
            flash,
            values,
            quick: [None; QUICK_SLOTS],
            shortcuts: Vec::new(),
            keys,
            screen,
        }
    }

    pub fn value(&self, id: SettingId) -> Option<i32> {
        index_of(id).map(|i| self.values[i])
    }

    /// Load everything from flash; missing records keep their defaults.
    pub fn load(&mut self) {
        let mut buf = [0u8; MAX_RECORD_SIZE];

        for (i, def) in SETTINGS.iter().enumerate() {
            if def.descriptor.temp_var {
                continue;
            }
            match self.read_record(def.descriptor.id.0, &mut buf) {
                Ok(Some(data)) if data.len() == 4 => {
                    let value = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
                    self.values[i] = value.clamp(def.min, def.max);
                }
                Ok(Some(_)) => warn!("Setting {} has a malformed record", def.descriptor.cfg_name),
                Ok(None) | Err(_) => {}
            }
        }

        if let Ok(Some(data)) = self.read_record(KEY_QUICK_SLOTS, &mut buf) {
            for (slot, bytes) in self.quick.iter_mut().zip(data.chunks_exact(2)) {
                let id = u16::from_le_bytes([bytes[0], bytes[1]]);
                *slot = (id != 0 && index_of(SettingId(id)).is_some()).then_some(SettingId(id));
            }
        }

        if let Ok(Some(data)) = self.read_record(KEY_SHORTCUTS, &mut buf) {
            self.shortcuts.clear();
            let count = data.first().copied().unwrap_or(0) as usize;
            for bytes in data.get(1..).unwrap_or(&[]).chunks_exact(2).take(count) {
                let id = SettingId(u16::from_le_bytes([bytes[0], bytes[1]]));
                if index_of(id).is_some() && !self.shortcuts.contains(&id) {
                    let _ = self.shortcuts.push(id);
                }
            }
        }

        info!(
            "Loaded settings: {} quick slots, {} shortcuts",
            self.quick.iter().filter(|s| s.is_some()).count(),
            self.shortcuts.len()
        );
    }

    /// Set every setting back to its default and persist. RAM is reset
    /// even when some writes fail; the first failure is reported.
    pub fn restore_defaults(&mut self) -> Result<(), menunav::Error> {
        for (value, def) in self.values.iter_mut().zip(SETTINGS.iter()) {
            *value = def.default;
        }
        save_all(SETTING_COUNT, |index| self.save_value(index)).map_err(|e| {
            warn!("Defaults restored in RAM only: {}", e);
            menunav::Error::Storage
        })?;
        info!("Settings restored to defaults");
        Ok(())
    }

    fn read_record<'b>(&mut self, key: u16, buf: &'b mut [u8]) -> Result<Option<&'b [u8]>, Error> {
        block_on(sequential_storage::map::fetch_item::<u16, &[u8], _>(
            &mut self.flash,
            STORAGE_START..STORAGE_END,
            &mut NoCache::new(),
            buf,
            &key,
        ))
        .map_err(|e| {
            error!("Flash read error: {:?}", defmt::Debug2Format(&e));
            Error::Storage
        })
    }

    fn write_record(&mut self, key: u16, item: &[u8]) -> Result<(), Error> {
        let mut buf = [0u8; MAX_RECORD_SIZE];
        block_on(sequential_storage::map::store_item::<u16, &[u8], _>(
            &mut self.flash,
            STORAGE_START..STORAGE_END,
            &mut NoCache::new(),
            &mut buf,
            &key,
            &item,
        ))
        .map_err(|e| {
            error!("Flash write error: {:?}", defmt::Debug2Format(&e));
            Error::Storage
        })
    }

    fn save_value(&mut self, index: usize) -> Result<(), Error> {
        let def = &SETTINGS[index];
        if def.descriptor.temp_var {
            return Ok(());
        }
        debug!("Saving {} = {}", def.descriptor.cfg_name, self.values[index]);
        let bytes = self.values[index].to_le_bytes();
        self.write_record(def.descriptor.id.0, &bytes)
    }

    fn save_quick_slots(&mut self) -> Result<(), Error> {
        let mut data = [0u8; QUICK_SLOTS * 2];
        for (bytes, slot) in data.chunks_exact_mut(2).zip(self.quick.iter()) {
            bytes.copy_from_slice(&slot.map_or(0, |id| id.0).to_le_bytes());
        }
        self.write_record(KEY_QUICK_SLOTS, &data)
    }

    fn save_shortcuts(&mut self) -> Result<(), Error> {
        let mut data = [0u8; 1 + MAX_SHORTCUTS * 2];
        let len = 1 + self.shortcuts.len() * 2;
        if len > MAX_RECORD_SIZE {
            return Err(Error::BufferOverflow);
        }
        data[0] = self.shortcuts.len() as u8;
        for (bytes, id) in data[1..len].chunks_exact_mut(2).zip(self.shortcuts.iter()) {
            bytes.copy_from_slice(&id.0.to_le_bytes());
        }
        self.write_record(KEY_SHORTCUTS, &data[..len])
    }

    /// Run the value editor for setting `index` until SELECT or back.
    fn edit(&mut self, index: usize, title: &str) {
        let def = &SETTINGS[index];
        let original = self.values[index];
        let mut value = original;

        loop {
            let mut text: heapless::String<16> = heapless::String::new();
            let _ = write!(text, "{} {}", value, def.unit);
            self.screen.borrow_mut().draw_value(title, &text);

            match self.keys.borrow_mut().next_action(ACTION_TICK_MS) {
                Action::Up => value = (value + def.step).min(def.max),
                Action::Down => value = (value - def.step).max(def.min),
                Action::Ok => break,
                Action::Cancel => {
                    value = original;
                    break;
                }
                _ => {}
            }
        }

        if value != original {
            self.values[index] = value;
            if let Err(e) = self.save_value(index) {
                warn!("Keeping {} in RAM only: {}", def.descriptor.cfg_name, e);
            }
        }
    }
}

impl<F, I2C> SettingStore for SettingsStore<'_, F, I2C>
where
    F: NorFlash,
    I2C: embedded_hal::i2c::I2c,
{
    fn find_setting(&self, id: SettingId) -> Option<SettingDescriptor> {
        index_of(id).map(|i| SETTINGS[i].descriptor)
    }

    fn edit_setting(&mut self, setting: &SettingDescriptor, title: &str) {
        if let Some(index) = index_of(setting.id) {
            self.edit(index, title);
        }
    }

    fn supports_quick_slots(&self, setting: &SettingDescriptor) -> bool {
        !setting.temp_var
    }

    fn apply_context_choice(
        &mut self,
        choice: ContextChoice,
        setting: &SettingDescriptor,
    ) -> Result<(), menunav::Error> {
        let index = index_of(setting.id).ok_or(menunav::Error::UnknownSetting)?;
        match choice {
            ContextChoice::Reset => {
                self.values[index] = SETTINGS[index].default;
                self.save_value(index).map_err(|_| menunav::Error::Storage)
            }
            ContextChoice::QuickSlot(slot) => {
                if setting.temp_var {
                    return Err(menunav::Error::QuickSlotUnavailable);
                }
                self.quick[slot.index()] = Some(setting.id);
                self.save_quick_slots().map_err(|_| menunav::Error::Storage)
            }
            ContextChoice::AddToShortcuts => {
                if self.shortcuts.contains(&setting.id) {
                    return Ok(());
                }
                self.shortcuts
                    .push(setting.id)
                    .map_err(|_| menunav::Error::ShortcutsFull)?;
                self.save_shortcuts().map_err(|_| menunav::Error::Storage)
            }
        }
    }
}
