#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::{info, println};
use defmt_rtt as _;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, RgbColor};
use embedded_graphics_framebuf::FrameBuf;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_alloc as _;
use esp_hal::main;
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{self, Input, InputConfig, Io, Level, Output, Pull},
    handler, ram,
    spi::master::Config,
    time::Rate,
};
use mipidsi::{Builder, interface::SpiInterface, models::ST7789};
use timetable::buzzer::Buzzer;
use timetable::datetime::DateTime;
use timetable::face::{Event, Host, TimetableFace};
use timetable::segment_display::{SegmentConfig, SegmentDisplay};

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

// 模式键和灯光键使用GPIO中断
static MODE_BUTTON: Mutex<RefCell<Option<Input>>> = Mutex::new(RefCell::new(None));
static LIGHT_BUTTON: Mutex<RefCell<Option<Input>>> = Mutex::new(RefCell::new(None));
static PENDING: Mutex<RefCell<PendingButtons>> = Mutex::new(RefCell::new(PendingButtons {
    mode_up: false,
    light_down: false,
}));

struct PendingButtons {
    mode_up: bool,
    light_down: bool,
}

const FBUF_WIDTH: usize = 240;
const FBUF_HEIGHT: usize = 80;
const FBUF_PIXELS: usize = FBUF_WIDTH * FBUF_HEIGHT;

/// Poll interval of the pump loop.
const POLL_MS: u32 = 50;
const POLLS_PER_SECOND: u32 = 1000 / POLL_MS;
/// Alarm button hold time that counts as a long press.
const LONG_PRESS_POLLS: u32 = 2000 / POLL_MS;
/// How long the LED stays lit after an illumination request.
const LED_ON_POLLS: u32 = 3000 / POLL_MS;
/// Seconds without button input before low-energy ticking.
const LOW_ENERGY_AFTER_SECS: u32 = 5 * 60;

/// Board-side implementation of the face's host contract.
struct BoardHost<'d, T>
where
    T: DrawTarget<Color = Rgb565>,
{
    display: T,
    fbuf: FrameBuf<Rgb565, &'d mut [Rgb565; FBUF_PIXELS]>,
    renderer: SegmentDisplay,
    buzzer: Buzzer<'d>,
    led: Output<'d>,
    now: DateTime,
    led_polls_left: u32,
    tick_indicator: bool,
    next_face_requested: bool,
}

impl<T> Host for BoardHost<'_, T>
where
    T: DrawTarget<Color = Rgb565>,
{
    fn date_time(&self) -> DateTime {
        self.now
    }

    fn display_label(&mut self, label: &str) {
        println!("render: {}", label);
        // 未点亮的段显示为暗淡的绿色（约1/4亮度）
        let _ = self.renderer.draw_label(
            &mut self.display,
            &mut self.fbuf,
            label,
            Rgb565::GREEN,
            Some(Rgb565::new(0, 4, 0)),
        );
    }

    fn tick_indicator_running(&self) -> bool {
        self.tick_indicator
    }

    fn stop_tick_indicator(&mut self) {
        self.tick_indicator = false;
    }

    fn illuminate_led(&mut self) {
        self.led.set_high();
        self.led_polls_left = LED_ON_POLLS;
    }

    fn buzzer_enabled(&self) -> bool {
        self.buzzer.is_enabled()
    }

    fn enable_buzzer(&mut self) {
        self.buzzer.enable();
    }

    fn disable_buzzer(&mut self) {
        self.buzzer.disable();
    }

    fn play_signal(&mut self) {
        self.buzzer.play_signal();
    }

    fn move_to_next_face(&mut self) {
        self.next_face_requested = true;
    }
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[main]
fn main() -> ! {
    esp_alloc::heap_allocator!(size: 64 * 1024);

    let mut delay = Delay::new();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let mut io = Io::new(peripherals.IO_MUX);
    io.set_interrupt_handler(button_handler);

    // ========== 按键配置（上拉，低电平按下）==========
    let input_config = InputConfig::default().with_pull(Pull::Up);
    let mut mode_button = Input::new(peripherals.GPIO35, input_config);
    let mut light_button = Input::new(peripherals.GPIO36, input_config);
    let alarm_button = Input::new(peripherals.GPIO37, input_config);

    critical_section::with(|cs| {
        // mode fires on release, light on press
        mode_button.listen(gpio::Event::RisingEdge);
        light_button.listen(gpio::Event::FallingEdge);
        MODE_BUTTON.borrow_ref_mut(cs).replace(mode_button);
        LIGHT_BUTTON.borrow_ref_mut(cs).replace(light_button);
    });

    // ========== LCD 显示初始化 ==========
    let dc = gpio::Output::new(peripherals.GPIO15, Level::Low, Default::default());
    let mut rst = gpio::Output::new(peripherals.GPIO7, Level::Low, Default::default());
    rst.set_high();
    let cs = gpio::Output::new(peripherals.GPIO16, Level::High, Default::default());
    let spi = esp_hal::spi::master::Spi::new(
        peripherals.SPI2,
        Config::default().with_frequency(Rate::from_mhz(30)),
    )
    .unwrap()
    .with_sck(peripherals.GPIO5)
    .with_mosi(peripherals.GPIO6);

    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).unwrap();
    let buffer = alloc::boxed::Box::leak(alloc::boxed::Box::new([0_u8; 512]));

    let di = SpiInterface::new(spi_device, dc, buffer);
    let mut display = Builder::new(ST7789, di)
        .reset_pin(rst)
        .display_size(240, 240)
        .color_order(mipidsi::options::ColorOrder::Rgb)
        .invert_colors(mipidsi::options::ColorInversion::Inverted)
        .init(&mut delay)
        .unwrap();
    display.clear(Rgb565::BLACK).unwrap();

    // ========== 蜂鸣器和照明LED ==========
    let buzzer_pin = Output::new(peripherals.GPIO17, Level::Low, Default::default());
    let led_pin = Output::new(peripherals.GPIO18, Level::Low, Default::default());

    // 帧缓冲区：一行标签（240x80），分配到堆上
    let data = alloc::boxed::Box::leak(alloc::boxed::Box::new([Rgb565::BLACK; FBUF_PIXELS]));
    let fbuf: FrameBuf<Rgb565, &'static mut [Rgb565; FBUF_PIXELS]> =
        FrameBuf::new(data, FBUF_WIDTH, FBUF_HEIGHT);

    let mut host = BoardHost {
        display,
        fbuf,
        renderer: SegmentDisplay::new(SegmentConfig::default()),
        buzzer: Buzzer::new(buzzer_pin, delay),
        led: led_pin,
        // No battery-backed RTC on this board; the clock starts from a
        // fixed Monday morning.
        now: DateTime::new(2026, 8, 31, 7, 59, 50),
        led_polls_left: 0,
        tick_indicator: true,
        next_face_requested: false,
    };

    let mut face = TimetableFace::new(0);
    face.activate(&mut host);
    face.on_event(Event::Activate, &mut host);
    info!("face {} up at {}", face.face_index(), host.now);

    let mut polls: u32 = 0;
    let mut alarm_held: u32 = 0;
    let mut idle_seconds: u32 = 0;

    loop {
        delay.delay_millis(POLL_MS);

        // 取出中断挂起的按键事件
        let (mode_up, light_down) = critical_section::with(|cs| {
            let mut pending = PENDING.borrow_ref_mut(cs);
            let taken = (pending.mode_up, pending.light_down);
            pending.mode_up = false;
            pending.light_down = false;
            taken
        });

        if mode_up {
            idle_seconds = 0;
            if !face.on_event(Event::ModeButtonUp, &mut host) && host.next_face_requested {
                host.next_face_requested = false;
                // Single-face list: wrap back around to the same face.
                face.resign(&mut host);
                face.activate(&mut host);
                face.on_event(Event::Activate, &mut host);
            }
        }
        if light_down {
            idle_seconds = 0;
            face.on_event(Event::LightButtonDown, &mut host);
        }

        // 闹钟键长按检测（轮询测量按住时长）
        if alarm_button.is_low() {
            alarm_held += 1;
            if alarm_held == LONG_PRESS_POLLS {
                idle_seconds = 0;
                face.on_event(Event::AlarmLongPress, &mut host);
            }
        } else {
            alarm_held = 0;
        }

        // LED 照明超时
        if host.led_polls_left > 0 {
            host.led_polls_left -= 1;
            if host.led_polls_left == 0 {
                host.led.set_low();
            }
        }

        // ========== 1 Hz 时钟 ==========
        polls += 1;
        if polls < POLLS_PER_SECOND {
            continue;
        }
        polls = 0;

        host.now.tick();
        idle_seconds = idle_seconds.saturating_add(1);

        // 整点后台任务（报时）
        if host.now.minute == 0 && host.now.second == 0 && face.wants_background_task(&host) {
            info!("hourly chime at {}", host.now);
            face.on_event(Event::BackgroundTask, &mut host);
        }

        if idle_seconds >= LOW_ENERGY_AFTER_SECS {
            // Nobody is pressing buttons; one forced refresh a minute is
            // plenty for an hour-level label.
            if host.now.second == 0 {
                face.on_event(Event::LowEnergyUpdate, &mut host);
            }
        } else {
            face.on_event(Event::Tick, &mut host);
        }

        // 秒指示灯（奇数秒点亮）
        if host.tick_indicator {
            let _ = host.renderer.draw_indicator(
                &mut host.display,
                host.now.second % 2 == 1,
                Rgb565::GREEN,
                Rgb565::BLACK,
            );
        }
    }
}

#[handler]
#[ram]
fn button_handler() {
    critical_section::with(|cs| {
        let mut pending = PENDING.borrow_ref_mut(cs);
        let mut mode_btn = MODE_BUTTON.borrow_ref_mut(cs);
        if let Some(ref mut btn) = *mode_btn
            && btn.is_interrupt_set() {
                pending.mode_up = true;
                btn.clear_interrupt();
            }
        let mut light_btn = LIGHT_BUTTON.borrow_ref_mut(cs);
        if let Some(ref mut btn) = *light_btn
            && btn.is_interrupt_set() {
                pending.light_down = true;
                btn.clear_interrupt();
            }
    });
}
