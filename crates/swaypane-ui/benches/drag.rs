use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::rc::Rc;
use swaypane_core::{ElementRef, Environment, Platform, RubberProfile};
use swaypane_testing::{FakeElement, FakeViewport, GestureRobot, TestRuntime};
use swaypane_ui::modal::{init_page_geometry, ModalGeometry, PageMeasurements, Release};
use swaypane_ui::{ModalDescriptor, ModalDragController, ModalElements, ModalRootConfig, ModalRootTouch};

fn settle_page_release(c: &mut Criterion) {
    let drag = ModalDragController::new(RubberProfile::Resisted);
    let geometry = init_page_geometry(
        &ModalGeometry::default(),
        60.0,
        PageMeasurements {
            content_height: 1_400.0,
            content_client_height: 700.0,
            header_height: 48.0,
            container_height: 800.0,
        },
    );

    c.bench_function("settle_page_release", |b| {
        b.iter(|| {
            let step = drag.page_step(black_box(&geometry), black_box(180.0), 800.0);
            let dragged = ModalGeometry {
                translate_y_current: step.translate,
                ..geometry
            };
            drag.settle_page(
                &dragged,
                60.0,
                step.shift_percent,
                Release {
                    start_y: 300.0,
                    shift_y: 180.0,
                    duration_ms: 220,
                },
                800.0,
            )
        });
    });
}

fn touch_root_drag_frame(c: &mut Criterion) {
    let runtime = TestRuntime::new();
    let root = ModalRootTouch::new(
        runtime.handle(),
        Rc::new(Environment::for_platform(Platform::Ios)),
        FakeViewport::new(390.0, 844.0),
        ModalRootConfig::new(vec![ModalDescriptor::page("sheet")]),
    );

    let inner = FakeElement::new();
    let header = FakeElement::new();
    let content = FakeElement::new();
    content.set_content_height(2_000.0);
    content.set_client_height(700.0);
    inner.set_container_height(844.0);
    inner.adopt(&header);
    inner.adopt(&content);
    let inner_ref: ElementRef = inner.clone();
    let header_ref: ElementRef = header.clone();
    let content_ref: ElementRef = content.clone();
    root.register_modal(
        "sheet",
        ModalElements::new()
            .with_inner(Rc::downgrade(&inner_ref))
            .with_header(Rc::downgrade(&header_ref))
            .with_content(Rc::downgrade(&content_ref)),
    );
    root.set_active_modal(Some("sheet"));
    runtime.next_frame();
    runtime.advance_by(1_000);

    let mut robot = GestureRobot::new(&runtime).on(content.element_id());
    c.bench_function("touch_root_drag_frame", |b| {
        b.iter(|| {
            robot.press(&root, 100.0, 300.0);
            // Slow and short: the sheet settles back to rest every time.
            robot.drag_by(&root, 0.0, 60.0, 6, 960);
            runtime.next_frame();
            robot.release(&root, 0);
            runtime.flush_frames(2);
        });
    });
}

criterion_group!(benches, settle_page_release, touch_root_drag_frame);
criterion_main!(benches);
