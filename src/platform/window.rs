//! Borderless fullscreen window on the primary display
//!
//! Frames are copied straight to the window's device context with
//! `SetDIBitsToDevice`. Input is collected by the window procedure into a
//! thread-local queue and drained by [`FullscreenWindow::poll_events`].

#![allow(unsafe_op_in_unsafe_fn)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ffi::c_void;

use tiny_skia::Pixmap;
use windows::Win32::Foundation::{
    FALSE, GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, TRUE, WIN32_ERROR, WPARAM,
};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, DIB_RGB_COLORS, GetDC, ReleaseDC, SetDIBitsToDevice,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::Input::KeyboardAndMouse::VK_ESCAPE;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::{PCWSTR, w};

use crate::platform::{DisplaySurface, SurfaceError, SurfaceEvent, check_frame_size};

// Matches the Win32 ERROR_CLASS_ALREADY_EXISTS (1410) code.
const CLASS_ALREADY_EXISTS_ERR: WIN32_ERROR = WIN32_ERROR(1410);

thread_local! {
    static PENDING: RefCell<VecDeque<SurfaceEvent>> = const { RefCell::new(VecDeque::new()) };
}

fn push_event(event: SurfaceEvent) {
    PENDING.with(|queue| queue.borrow_mut().push_back(event));
}

/// Signed client coordinates packed into a mouse message's `LPARAM`
fn pointer_position(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32;
    (x, y)
}

pub struct FullscreenWindow {
    hwnd: HWND,
    width: u32,
    height: u32,
    /// Frame converted to BGRA, reused between presents
    bgra: Vec<u8>,
}

impl FullscreenWindow {
    /// Opens a window covering the primary display and hides the cursor
    pub fn open() -> Result<Self, SurfaceError> {
        unsafe {
            // Real pixel coordinates instead of scaled ones
            if let Err(err) = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) {
                tracing::debug!(error = %err, "DPI awareness already set");
            }

            let module = GetModuleHandleW(PCWSTR::null()).map_err(|err| {
                tracing::error!(error = %err, "GetModuleHandleW failed");
                SurfaceError::ClassRegistrationFailed
            })?;
            let instance: HINSTANCE = module.into();
            register_class(instance)?;

            let width = GetSystemMetrics(SM_CXSCREEN).max(1);
            let height = GetSystemMetrics(SM_CYSCREEN).max(1);

            let hwnd = CreateWindowExW(
                WS_EX_TOPMOST,
                w!("TodayBoardWindow"),
                w!("Today"),
                WS_POPUP | WS_VISIBLE,
                0,
                0,
                width,
                height,
                None,
                None,
                instance,
                None,
            );
            if hwnd.0 == 0 {
                return Err(SurfaceError::WindowCreationFailed);
            }

            ShowCursor(FALSE);
            tracing::info!(width, height, "Fullscreen window opened");

            Ok(Self {
                hwnd,
                width: width as u32,
                height: height as u32,
                bgra: Vec::new(),
            })
        }
    }
}

fn register_class(instance: HINSTANCE) -> Result<(), SurfaceError> {
    unsafe {
        let wnd_class = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(board_wnd_proc),
            hInstance: instance,
            lpszClassName: w!("TodayBoardWindow"),
            ..Default::default()
        };

        if RegisterClassW(&wnd_class) == 0 {
            match GetLastError() {
                Err(err) if err.code() == CLASS_ALREADY_EXISTS_ERR.to_hresult() => {}
                _ => return Err(SurfaceError::ClassRegistrationFailed),
            }
        }
    }
    Ok(())
}

unsafe extern "system" fn board_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_LBUTTONDOWN => {
            let (x, y) = pointer_position(lparam);
            push_event(SurfaceEvent::PointerDown { x, y });
            LRESULT(0)
        }
        WM_KEYDOWN => {
            if wparam.0 as u16 == VK_ESCAPE.0 {
                push_event(SurfaceEvent::Escape);
            }
            LRESULT(0)
        }
        WM_CLOSE => {
            push_event(SurfaceEvent::Quit);
            LRESULT(0)
        }
        // Every frame repaints the whole window
        WM_ERASEBKGND => LRESULT(1),
        WM_DESTROY => LRESULT(0),
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

impl DisplaySurface for FullscreenWindow {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn poll_events(&mut self) -> Result<Vec<SurfaceEvent>, SurfaceError> {
        unsafe {
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                if msg.message == WM_QUIT {
                    push_event(SurfaceEvent::Quit);
                    break;
                }
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        Ok(PENDING.with(|queue| queue.borrow_mut().drain(..).collect()))
    }

    fn present(&mut self, frame: &Pixmap) -> Result<(), SurfaceError> {
        check_frame_size(frame, self.size())?;

        // tiny-skia stores RGBA, GDI expects BGRA
        self.bgra.clear();
        self.bgra.extend_from_slice(frame.data());
        for px in self.bgra.chunks_exact_mut(4) {
            px.swap(0, 2);
        }

        let mut bitmap_info = BITMAPINFO::default();
        bitmap_info.bmiHeader = BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: self.width as i32,
            biHeight: -(self.height as i32), // top-down rows
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        };

        unsafe {
            let hdc = GetDC(self.hwnd);
            if hdc.0 == 0 {
                return Err(SurfaceError::DeviceContextFailed);
            }
            let lines = SetDIBitsToDevice(
                hdc,
                0,
                0,
                self.width,
                self.height,
                0,
                0,
                0,
                self.height,
                self.bgra.as_ptr() as *const c_void,
                &bitmap_info,
                DIB_RGB_COLORS,
            );
            ReleaseDC(self.hwnd, hdc);

            if lines == 0 {
                return Err(SurfaceError::PresentFailed);
            }
        }
        Ok(())
    }
}

impl Drop for FullscreenWindow {
    fn drop(&mut self) {
        unsafe {
            ShowCursor(TRUE);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}
