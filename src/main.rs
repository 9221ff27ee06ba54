//! menunav reference firmware for the nRF52840.
//!
//! Brings up the SSD1306 OLED and the button pad, loads the settings from
//! flash and runs the main menu forever.
//!
//! Pin mapping lives in `menunav::config`.

#![no_std]
#![no_main]

mod board;
mod storage;
mod ui;

use core::cell::RefCell;

use cortex_m_rt::entry;
use defmt::{info, warn};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_nrf::gpio::Pin;
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use menunav::action::SystemEvent;
use menunav::menu::{Icon, MenuItem};
use menunav::{
    Action, Collaborators, EventOutcome, MenuConfig, MenuEngine, MenuResult, PlaybackStatus,
    SystemHooks,
};
use {defmt_rtt as _, panic_probe as _};

use storage::SettingsStore;
use ui::buttons::ButtonPad;
use ui::display::OledList;
use ui::{Keys, Screen};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

// Menu tree

/// Value returned by "Restore Defaults".
const RESTORE_DEFAULTS: i32 = 1;

const VOLUME_ITEM: MenuItem<'static> = MenuItem::setting(storage::VOLUME);
const BASS_ITEM: MenuItem<'static> = MenuItem::setting(storage::BASS);
const TREBLE_ITEM: MenuItem<'static> = MenuItem::setting(storage::TREBLE);
const BALANCE_ITEM: MenuItem<'static> = MenuItem::setting(storage::BALANCE);
const SOUND_MENU: MenuItem<'static> = MenuItem::submenu(
    "Sound Settings",
    &[&VOLUME_ITEM, &BASS_ITEM, &TREBLE_ITEM, &BALANCE_ITEM],
);

const BACKLIGHT_ITEM: MenuItem<'static> = MenuItem::setting(storage::BACKLIGHT);
const CONTRAST_ITEM: MenuItem<'static> = MenuItem::setting(storage::CONTRAST);
const SCROLL_ITEM: MenuItem<'static> = MenuItem::setting(storage::SCROLL_SPEED);
const DISPLAY_MENU: MenuItem<'static> =
    MenuItem::submenu("Display", &[&BACKLIGHT_ITEM, &CONTRAST_ITEM, &SCROLL_ITEM]);

const SLEEP_ITEM: MenuItem<'static> = MenuItem::setting_with_text(storage::SLEEP_TIMER, "Sleep");
const RESTORE_ITEM: MenuItem<'static> =
    MenuItem::return_value("Restore Defaults", RESTORE_DEFAULTS).with_icon(Icon::FunctionCall);
const SYSTEM_MENU: MenuItem<'static> = MenuItem::submenu("System", &[&SLEEP_ITEM, &RESTORE_ITEM]);

const MAIN_MENU: MenuItem<'static> =
    MenuItem::submenu("Main Menu", &[&SOUND_MENU, &DISPLAY_MENU, &SYSTEM_MENU]);

/// System services of a board without an audio path.
struct Standalone;

impl SystemHooks for Standalone {
    fn playback_status(&self) -> PlaybackStatus {
        PlaybackStatus::Stopped
    }

    fn quick_screen(&mut self, _action: Action) {
        warn!("Quick screen not available on this board");
    }

    fn stop_playback(&mut self) -> bool {
        false
    }

    fn default_event(&mut self, action: Action) -> EventOutcome {
        match action {
            Action::System(SystemEvent::UsbConnected) => EventOutcome::UsbConnected,
            _ => EventOutcome::Ignored,
        }
    }

    fn broadcast_redraw(&mut self) {}
}

#[entry]
fn main() -> ! {
    info!("menunav starting");
    let p = embassy_nrf::init(Default::default());

    // Display
    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);
    let display = match ui::display::init(i2c) {
        Ok(display) => display,
        Err(e) => board::halt(e),
    };
    let screen = RefCell::new(OledList::new(display));

    // Buttons
    let pad = RefCell::new(ButtonPad::new(
        p.P0_11.degrade(),
        p.P0_12.degrade(),
        p.P0_24.degrade(),
    ));

    // Settings
    let flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let mut settings = SettingsStore::new(flash, &pad, &screen);
    settings.load();
    apply_contrast(&settings, &screen);

    let main_menu: &MenuItem<'static> = &MAIN_MENU;
    let config = MenuConfig::new()
        .with_main_menu(main_menu)
        .with_quick_screen(false);
    let mut selected = 0;

    info!("Entering main menu");
    loop {
        let result = {
            let mut keys = Keys(&pad);
            let mut list = Screen(&screen);
            let mut system = Standalone;
            let mut engine = MenuEngine::new(
                Collaborators {
                    input: &mut keys,
                    list: &mut list,
                    settings: &mut settings,
                    system: &mut system,
                },
                config,
            );
            engine.do_menu(main_menu, Some(&mut selected))
        };
        info!("Main menu returned {}", result);

        if let Err(e) = handle_result(result, &mut settings) {
            warn!("Main menu: {}", e);
        }
        apply_contrast(&settings, &screen);
    }
}

fn handle_result<F, I2C>(
    result: MenuResult,
    settings: &mut SettingsStore<'_, F, I2C>,
) -> Result<(), board::Error>
where
    F: embedded_storage_async::nor_flash::NorFlash,
    I2C: embedded_hal::i2c::I2c,
{
    match result {
        MenuResult::Value(RESTORE_DEFAULTS) => settings.restore_defaults()?,
        MenuResult::UsbAttached => info!("USB attached"),
        _ => {}
    }
    Ok(())
}

fn apply_contrast<F, I2C>(settings: &SettingsStore<'_, F, I2C>, screen: &RefCell<OledList<I2C>>)
where
    F: embedded_storage_async::nor_flash::NorFlash,
    I2C: embedded_hal::i2c::I2c,
{
    if let Some(level) = settings.value(storage::CONTRAST) {
        screen.borrow_mut().set_contrast(level.clamp(0, 15) as u8);
    }
}
