//! Integration tests for save/restore and clipping through the drawing context
//!
//! Both reference backends run the same call sequences; the logical state
//! must not depend on which adapter is active.

use strata_core::{ClipPath, FillRule, GeometryError, Matrix, PathBuilder, Rect};
use strata_paint::{
    BackendAdapter, BalancedStackAdapter, DisplayList, DisplayListProvider, DrawingContext,
    ImmediateSurface, PaintError, PopCountedAdapter, SoftwareContext, SoftwareProvider,
    SurfaceConfig, SurfaceProvider,
};

const EPS: f64 = 1e-9;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn surface() -> Rect {
    Rect::new(0.0, 0.0, 400.0, 300.0)
}

fn software() -> DrawingContext<BalancedStackAdapter<SoftwareContext>, SoftwareProvider> {
    init_tracing();
    DrawingContext::new(
        BalancedStackAdapter::new(),
        SoftwareProvider::new(surface()),
        SurfaceConfig::default(),
    )
}

fn display_list() -> DrawingContext<PopCountedAdapter<DisplayList>, DisplayListProvider> {
    init_tracing();
    DrawingContext::new(
        PopCountedAdapter::new(),
        DisplayListProvider::new(surface()),
        SurfaceConfig::default(),
    )
}

fn assert_bounds(actual: Option<Rect>, expected: Rect) {
    let actual = actual.expect("expected a clip");
    assert!(
        actual.approx_eq(&expected, EPS),
        "clip bounds {actual:?}, expected {expected:?}"
    );
}

fn scaled_clip_then_restore<A, P>(ctx: &mut DrawingContext<A, P>)
where
    A: BackendAdapter,
    P: SurfaceProvider<Session = A::Session>,
{
    ctx.translate_transform(10.0, 10.0);
    ctx.save_transform();
    ctx.scale_transform(2.0, 2.0);
    ctx.set_clip(Rect::new(0.0, 0.0, 50.0, 50.0));
    assert_bounds(ctx.clip_bounds().unwrap(), Rect::new(0.0, 0.0, 50.0, 50.0));
    ctx.restore_transform().unwrap();

    assert_eq!(ctx.current_transform(), Matrix::translate(10.0, 10.0));
    assert_eq!(ctx.clip_bounds().unwrap(), None);
}

fn nested_rotate_translate<A, P>(ctx: &mut DrawingContext<A, P>)
where
    A: BackendAdapter,
    P: SurfaceProvider<Session = A::Session>,
{
    ctx.save_transform();
    ctx.rotate_transform(90.0);
    ctx.save_transform();
    ctx.translate_transform(5.0, 0.0);
    ctx.restore_transform().unwrap();
    ctx.restore_transform().unwrap();

    assert_eq!(ctx.current_transform(), Matrix::IDENTITY);
    assert_eq!(ctx.save_depth(), 0);
    assert_eq!(ctx.native_depth(), 0);
}

#[test]
fn test_clip_set_inside_frame_ends_with_frame() {
    let mut ctx = software();
    scaled_clip_then_restore(&mut ctx);
    assert!(ctx.session().device_clip().is_none());
    assert_eq!(ctx.session().ctm(), Matrix::translate(10.0, 10.0));

    let mut ctx = display_list();
    scaled_clip_then_restore(&mut ctx);
    assert_eq!(ctx.session().depth(), 1);
    assert!(ctx.session().effective_clip().is_none());
}

#[test]
fn test_nested_frames_unwind_to_identity() {
    let mut ctx = software();
    nested_rotate_translate(&mut ctx);
    let session = ctx.finish();
    assert_eq!(session.depth(), 0);

    let mut ctx = display_list();
    nested_rotate_translate(&mut ctx);
    let list = ctx.finish();
    assert!(list.is_balanced());
}

#[test]
fn test_round_trip_after_many_operations() {
    let mut ctx = software();
    ctx.translate_transform(12.0, -7.0);
    ctx.rotate_transform(33.0);
    let before = ctx.current_transform();

    ctx.save_transform();
    for i in 0..40 {
        ctx.rotate_transform(7.5 * i as f64);
        ctx.scale_transform(1.05, 0.97);
        ctx.translate_transform(0.3, -0.2);
        ctx.multiply_transform(&Matrix::new(1.0, 0.1, 0.0, 1.0, 0.0, 0.0));
    }
    ctx.restore_transform().unwrap();

    assert!(ctx.current_transform().approx_eq(&before, 1e-6));
    assert!(ctx.session().ctm().approx_eq(&before, 1e-6));
}

#[test]
fn test_clip_narrowing_and_reset() {
    let mut ctx = software();
    ctx.set_clip(Rect::new(0.0, 0.0, 100.0, 100.0));

    ctx.save_transform();
    ctx.translate_transform(10.0, 10.0);
    let outer = ctx.clip_bounds().unwrap().unwrap();
    assert!(outer.approx_eq(&Rect::new(-10.0, -10.0, 100.0, 100.0), EPS));

    // Larger than the inherited clip: bounded by it
    ctx.set_clip(Rect::new(0.0, 0.0, 200.0, 200.0));
    let inner = ctx.clip_bounds().unwrap().unwrap();
    assert!(outer.contains_rect(&inner, EPS));
    assert!(inner.approx_eq(&Rect::new(0.0, 0.0, 90.0, 90.0), EPS));
    assert_bounds(ctx.session().device_clip().bounds(), Rect::new(10.0, 10.0, 90.0, 90.0));

    // A second clip in the same frame replaces the first
    ctx.set_clip(Rect::new(0.0, 0.0, 20.0, 20.0));
    ctx.set_clip(Rect::new(0.0, 0.0, 50.0, 50.0));
    assert_bounds(ctx.clip_bounds().unwrap(), Rect::new(0.0, 0.0, 50.0, 50.0));
    assert_bounds(ctx.session().device_clip().bounds(), Rect::new(10.0, 10.0, 50.0, 50.0));

    ctx.reset_clip();
    assert_bounds(ctx.clip_bounds().unwrap(), outer);
    assert_bounds(ctx.session().device_clip().bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(ctx.current_transform(), Matrix::translate(10.0, 10.0));
    assert_eq!(ctx.session().ctm(), Matrix::translate(10.0, 10.0));

    ctx.restore_transform().unwrap();
    assert_bounds(ctx.clip_bounds().unwrap(), Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(ctx.current_transform(), Matrix::IDENTITY);
}

#[test]
fn test_reset_clip_at_base_layer() {
    let mut ctx = display_list();
    ctx.set_clip(Rect::new(5.0, 5.0, 10.0, 10.0));
    assert_eq!(ctx.native_depth(), 1);

    ctx.reset_clip();
    assert_eq!(ctx.clip_bounds().unwrap(), None);
    assert_eq!(ctx.native_depth(), 0);
    assert!(ctx.finish().is_balanced());
}

#[test]
fn test_path_clip_under_rotation() {
    let mut ctx = software();
    let triangle = PathBuilder::new()
        .move_to(0.0, 0.0)
        .line_to(30.0, 0.0)
        .line_to(0.0, 40.0)
        .close()
        .build();

    ctx.save_transform();
    ctx.rotate_transform(90.0);
    ctx.set_clip(ClipPath::new(triangle, FillRule::EvenOdd));
    assert_bounds(ctx.clip_bounds().unwrap(), Rect::new(0.0, 0.0, 30.0, 40.0));

    // Rotated 90 degrees clockwise, x maps onto y
    assert_bounds(ctx.session().device_clip().bounds(), Rect::new(-40.0, 0.0, 40.0, 30.0));

    ctx.rotate_transform(45.0);
    let local = ctx.clip_bounds().unwrap().unwrap();
    assert!(local.width() >= 30.0 && local.height() >= 40.0);

    ctx.restore_transform().unwrap();
    assert_eq!(ctx.clip_bounds().unwrap(), None);
}

#[test]
fn test_unbalanced_restore_changes_nothing() {
    let mut ctx = software();
    ctx.translate_transform(3.0, 4.0);
    ctx.set_clip(Rect::new(0.0, 0.0, 8.0, 8.0));

    let err = ctx.restore_transform().unwrap_err();
    assert_eq!(err, PaintError::UnbalancedRestore);
    assert_eq!(ctx.current_transform(), Matrix::translate(3.0, 4.0));
    assert_bounds(ctx.clip_bounds().unwrap(), Rect::new(0.0, 0.0, 8.0, 8.0));
    assert_eq!(ctx.native_depth(), 2);
}

#[test]
fn test_clip_bounds_under_singular_transform() {
    let mut ctx = software();
    ctx.scale_transform(0.0, 1.0);
    // Unclipped needs no inverse
    assert_eq!(ctx.clip_bounds().unwrap(), None);

    ctx.set_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(matches!(
        ctx.clip_bounds(),
        Err(PaintError::Geometry(GeometryError::SingularMatrix { .. }))
    ));
}

#[test]
fn test_pop_counted_issues_exact_pops() {
    let mut ctx = display_list();
    ctx.translate_transform(1.0, 1.0);

    ctx.save_transform();
    ctx.translate_transform(1.0, 2.0);
    ctx.rotate_transform(30.0);
    ctx.multiply_transform(&Matrix::IDENTITY);
    ctx.scale_transform(2.0, 2.0);
    ctx.set_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
    // Identity is deferred and costs no native push
    assert_eq!(ctx.native_depth(), 5);
    assert_eq!(ctx.session().depth(), 5);

    ctx.restore_transform().unwrap();
    assert_eq!(ctx.native_depth(), 1);
    assert_eq!(ctx.session().effective_transform(), Matrix::translate(1.0, 1.0));

    let list = ctx.finish();
    assert!(list.is_balanced());
    let pushes = list
        .commands()
        .iter()
        .filter(|cmd| !matches!(cmd, strata_paint::DisplayCommand::Pop))
        .count();
    assert_eq!(pushes, 5);
}

#[test]
fn test_finish_unwinds_open_frames() {
    let mut ctx = software();
    ctx.save_transform();
    ctx.translate_transform(4.0, 4.0);
    ctx.save_transform();
    ctx.set_clip(Rect::new(0.0, 0.0, 1.0, 1.0));

    let session = ctx.finish();
    assert_eq!(session.depth(), 0);
    assert_eq!(session.ctm(), Matrix::IDENTITY);
    assert!(session.device_clip().is_none());
}

#[test]
#[should_panic(expected = "popping 1 native states with only 0 outstanding")]
fn test_balanced_over_pop_is_fatal() {
    let mut adapter = BalancedStackAdapter::<SoftwareContext>::new();
    let mut session = SoftwareContext::new(1, surface());
    adapter.begin(&mut session, &Matrix::IDENTITY);
    adapter.pop_native(&mut session, 1);
}

#[test]
#[should_panic(expected = "session ended with 1 native states still pushed")]
fn test_pop_counted_end_with_outstanding_push_is_fatal() {
    let mut adapter = PopCountedAdapter::<DisplayList>::new();
    let mut session = DisplayList::new();
    adapter.begin(&mut session, &Matrix::IDENTITY);
    adapter.push_transform(&mut session, &Matrix::translate(1.0, 0.0));
    adapter.end(&mut session);
}

#[test]
#[should_panic(expected = "software context")]
fn test_native_restore_underflow_is_fatal() {
    let mut session = SoftwareContext::new(1, surface());
    session.save_state();
    session.restore_state();
    session.restore_state();
}
