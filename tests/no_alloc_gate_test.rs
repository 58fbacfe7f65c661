use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use diffused_rays::core::maps::{test_map, TEST_MAP_START};
use diffused_rays::core::{Player, Raycaster, RenderParams};
use diffused_rays::input::InputHandler;
use diffused_rays::term::{FrameBuffer, FrameView, HudView, StylizationStatus, Viewport};
use diffused_rays::types::{Frame, InputAction};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

// One test per binary: the counter is global.
#[test]
fn per_tick_hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let map = test_map().unwrap();
    let (x, y, heading) = TEST_MAP_START;
    let mut player = Player::spawn(x, y, heading, &map).unwrap();
    let raycaster = Raycaster::new(RenderParams::default()).unwrap();
    let mut frame = Frame::new(1, 1);
    let mut input = InputHandler::new();
    let view = FrameView::new();
    let viewport = Viewport::new(160, 66);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);
    let hud = HudView {
        stylization: StylizationStatus::On,
        stylizer: Some("posterize"),
        preset: "dungeon",
        staleness: 3,
        in_flight: true,
        fps: 60,
    };

    // Warm-up sizes the frame buffer.
    raycaster.render_into(&player, &map, &mut frame);

    let allocs = with_alloc_counting(|| {
        for i in 0..200u64 {
            input.handle_press(InputAction::MoveForward, i * 16);
            input.handle_press(InputAction::TurnRight, i * 16);
            if i % 50 == 0 {
                input.handle_press(InputAction::CycleStyle, i * 16);
            }
            let sample = input.sample(i * 16);

            if sample.turn_right {
                let _ = player.rotate(0.05);
            }
            if sample.move_forward {
                let _ = player.forward(0.05, &map);
            }
            raycaster.render_into(&player, &map, &mut frame);
            view.render_into(&frame, Some(&hud), viewport, &mut fb);
        }
    });

    assert_eq!(allocs, 0);
}
