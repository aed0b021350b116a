//! Global capture hotkey.
//!
//! The listener runs on its own thread and only raises a flag; the session
//! thread consumes it with `swap(false)` and performs the action itself.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
#[cfg(any(target_os = "macos", target_os = "windows"))]
use std::sync::atomic::Ordering;

/// Human-readable chord, or `None` where no listener exists.
pub fn chord() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("Cmd+Shift+K")
    } else if cfg!(target_os = "windows") {
        Some("Ctrl+Shift+K")
    } else {
        None
    }
}

#[cfg(target_os = "macos")]
pub fn start_hotkey_listener(flag: Arc<AtomicBool>) {
    use std::ffi::c_void;

    type CGEventTapProxy = *mut c_void;
    type CGEventRef = *mut c_void;
    type CFMachPortRef = *mut c_void;
    type CFRunLoopSourceRef = *mut c_void;
    type CFRunLoopRef = *mut c_void;
    type CFStringRef = *const c_void;

    type TapCallback = unsafe extern "C" fn(CGEventTapProxy, u32, CGEventRef, *mut c_void) -> CGEventRef;

    const HID_EVENT_TAP: u32 = 0;
    const HEAD_INSERT: u32 = 0;
    const LISTEN_ONLY: u32 = 1;
    const KEY_DOWN: u32 = 10;
    const KEYCODE_FIELD: u32 = 9;
    const KEYCODE_K: i64 = 40;

    const FLAG_SHIFT: u64 = 0x0002_0000;
    const FLAG_CONTROL: u64 = 0x0004_0000;
    const FLAG_ALTERNATE: u64 = 0x0008_0000;
    const FLAG_COMMAND: u64 = 0x0010_0000;

    extern "C" {
        fn CGEventTapCreate(
            tap: u32,
            place: u32,
            options: u32,
            events_of_interest: u64,
            callback: TapCallback,
            user_info: *mut c_void,
        ) -> CFMachPortRef;
        fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
        fn CGEventGetFlags(event: CGEventRef) -> u64;
        fn CGEventGetIntegerValueField(event: CGEventRef, field: u32) -> i64;
        fn CFMachPortCreateRunLoopSource(allocator: *const c_void, port: CFMachPortRef, order: i64) -> CFRunLoopSourceRef;
        fn CFRunLoopGetCurrent() -> CFRunLoopRef;
        fn CFRunLoopAddSource(rl: CFRunLoopRef, source: CFRunLoopSourceRef, mode: CFStringRef);
        fn CFRunLoopRun();
        static kCFRunLoopCommonModes: CFStringRef;
    }

    unsafe extern "C" fn on_event(
        _proxy: CGEventTapProxy,
        event_type: u32,
        event: CGEventRef,
        user_info: *mut c_void,
    ) -> CGEventRef {
        if event_type != KEY_DOWN {
            return event;
        }
        let flags = unsafe { CGEventGetFlags(event) };
        let keycode = unsafe { CGEventGetIntegerValueField(event, KEYCODE_FIELD) };
        let wanted = flags & (FLAG_COMMAND | FLAG_SHIFT) == (FLAG_COMMAND | FLAG_SHIFT)
            && flags & (FLAG_ALTERNATE | FLAG_CONTROL) == 0;
        if keycode == KEYCODE_K && wanted {
            let flag = unsafe { &*(user_info as *const AtomicBool) };
            flag.store(true, Ordering::Release);
        }
        event
    }

    std::thread::spawn(move || unsafe {
        let flag_ptr = Arc::into_raw(flag) as *mut c_void;
        let tap = CGEventTapCreate(HID_EVENT_TAP, HEAD_INSERT, LISTEN_ONLY, 1 << KEY_DOWN, on_event, flag_ptr);
        if tap.is_null() {
            crate::logger::error(
                "cannot listen for Cmd+Shift+K: grant Accessibility permission to your terminal",
            );
            drop(Arc::from_raw(flag_ptr as *const AtomicBool));
            return;
        }
        let source = CFMachPortCreateRunLoopSource(std::ptr::null(), tap, 0);
        CFRunLoopAddSource(CFRunLoopGetCurrent(), source, kCFRunLoopCommonModes);
        CGEventTapEnable(tap, true);
        crate::logger::info("global hotkey Cmd+Shift+K registered");
        CFRunLoopRun(); // never returns
    });
}

#[cfg(target_os = "windows")]
pub fn start_hotkey_listener(flag: Arc<AtomicBool>) {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{RegisterHotKey, MOD_CONTROL, MOD_NOREPEAT, MOD_SHIFT, VK_K};
    use windows::Win32::UI::WindowsAndMessaging::{GetMessageW, MSG, WM_HOTKEY};

    const HOTKEY_ID: i32 = 1;

    std::thread::spawn(move || unsafe {
        // The hotkey belongs to this thread's message queue.
        if let Err(e) = RegisterHotKey(HWND::default(), HOTKEY_ID, MOD_CONTROL | MOD_SHIFT | MOD_NOREPEAT, VK_K.0 as u32) {
            crate::logger::error(&format!("cannot register Ctrl+Shift+K: {}", e));
            return;
        }
        crate::logger::info("global hotkey Ctrl+Shift+K registered");

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, HWND::default(), 0, 0).0 > 0 {
            if msg.message == WM_HOTKEY && msg.wParam.0 == HOTKEY_ID as usize {
                flag.store(true, Ordering::Release);
            }
        }
    });
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub fn start_hotkey_listener(_flag: Arc<AtomicBool>) {
    crate::logger::info("no global hotkey on this platform");
}
