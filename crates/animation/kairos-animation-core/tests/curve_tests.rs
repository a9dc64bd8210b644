use std::cell::Cell;
use std::rc::Rc;

use kairos_animation_core::{
    ComboVectorCurve, ConstantCurve, Curve, Interval, Invariance, KFLinearCurve, KFStepCurve,
    KeyFrame, Result, Time, Value, ValueChangeListeners, ValueType, MAX_TIME, MIN_TIME, UNIVERSAL,
};

fn t(v: f64) -> Time {
    Time::from_number(v)
}

fn keys() -> Vec<KeyFrame> {
    vec![(0.0, 5.0).into(), (1.0, 40.0).into()]
}

fn number_at(curve: &dyn Curve, time: f64) -> f64 {
    curve
        .value(t(time), ValueType::Number)
        .unwrap()
        .as_number()
        .unwrap()
}

#[test]
fn linear_interpolates_and_clamps() {
    let c = KFLinearCurve::with_key_frames(ValueType::Number, keys()).unwrap();
    assert_eq!(number_at(&c, 0.5), 22.5);
    assert_eq!(number_at(&c, -1.0), 5.0);
    assert_eq!(number_at(&c, 2.0), 40.0);
    assert_eq!(number_at(&c, 1.0), 40.0);
}

#[test]
fn linear_invariance_is_outside_the_keys() {
    let c = KFLinearCurve::with_key_frames(ValueType::Number, keys()).unwrap();
    assert_eq!(
        c.invariance(UNIVERSAL).unwrap().intervals(),
        vec![Interval::closed(MIN_TIME, t(0.0)), Interval::closed(t(1.0), MAX_TIME)]
    );
    assert!(c
        .invariance(Interval::open(t(0.0), t(1.0)))
        .unwrap()
        .is_empty());
}

#[test]
fn linear_vectors_interpolate_per_component() {
    let c = KFLinearCurve::with_key_frames(
        ValueType::Vector2,
        vec![
            KeyFrame::new(t(0.0), Value::vec2(0.0, 10.0)),
            KeyFrame::new(t(2.0), Value::vec2(4.0, 20.0)),
        ],
    )
    .unwrap();
    assert_eq!(c.value(t(1.0), ValueType::Vector2).unwrap(), Value::vec2(2.0, 15.0));
}

#[test]
fn step_holds_until_next_key() {
    let c = KFStepCurve::with_key_frames(ValueType::Number, keys()).unwrap();
    assert_eq!(number_at(&c, 0.999), 5.0);
    assert_eq!(number_at(&c, 1.0), 40.0);
    assert_eq!(number_at(&c, -3.0), 5.0);
}

#[test]
fn combo_of_constants() {
    let parts: Vec<Rc<dyn Curve>> = [1.0, 2.0, 3.0]
        .into_iter()
        .map(|v| -> Rc<dyn Curve> {
            Rc::new(ConstantCurve::new(ValueType::Number, Some(Value::Number(v))).unwrap())
        })
        .collect();
    let combo = ComboVectorCurve::new(ValueType::Vector3, parts).unwrap();
    for time in [-100.0, 0.0, 7.5] {
        assert_eq!(
            combo.value(t(time), ValueType::Vector3).unwrap(),
            Value::vec3(1.0, 2.0, 3.0)
        );
    }
    assert_eq!(combo.invariance(UNIVERSAL).unwrap().intervals(), vec![UNIVERSAL]);
}

#[test]
fn combo_invariance_is_merge_of_children() {
    let x: Rc<dyn Curve> =
        Rc::new(KFStepCurve::with_key_frames(ValueType::Number, keys()).unwrap());
    let y: Rc<dyn Curve> = Rc::new(
        KFStepCurve::with_key_frames(ValueType::Number, vec![(0.0, 0.0).into(), (2.0, 1.0).into()])
            .unwrap(),
    );
    let combo = ComboVectorCurve::new(ValueType::Vector2, vec![x, y]).unwrap();
    assert_eq!(
        combo.invariance(UNIVERSAL).unwrap().intervals(),
        vec![
            Interval::new(MIN_TIME, t(1.0), false, true),
            Interval::new(t(1.0), t(2.0), false, true),
            Interval::closed(t(2.0), MAX_TIME),
        ]
    );
    assert_eq!(combo.value(t(1.5), ValueType::Vector2).unwrap(), Value::vec2(40.0, 0.0));
}

#[test]
fn combo_forwards_child_changes() {
    let x = Rc::new(ConstantCurve::new(ValueType::Number, None).unwrap());
    let y: Rc<dyn Curve> = Rc::new(ConstantCurve::new(ValueType::Number, None).unwrap());
    let x_dyn: Rc<dyn Curve> = x.clone();
    let combo = ComboVectorCurve::new(ValueType::Vector2, vec![x_dyn, y]).unwrap();

    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    combo.add_value_change_listener(Rc::new(move |_| h.set(h.get() + 1)));

    x.set_value(Value::Number(2.0)).unwrap();
    assert_eq!(hits.get(), 1);
    assert_eq!(combo.value(t(0.0), ValueType::Vector2).unwrap(), Value::vec2(2.0, 0.0));

    let z = Rc::new(ConstantCurve::new(ValueType::Number, Some(Value::Number(9.0))).unwrap());
    combo.set_child(0, z).unwrap();
    assert_eq!(hits.get(), 2);
    assert_eq!(x.listeners().len(), 0);

    // The old child no longer reaches the combo.
    x.set_value(Value::Number(3.0)).unwrap();
    assert_eq!(hits.get(), 2);
    assert_eq!(combo.value(t(0.0), ValueType::Vector2).unwrap(), Value::vec2(9.0, 0.0));
}

#[test]
fn curves_serve_convertible_types() {
    let c = ConstantCurve::new(ValueType::Number, Some(Value::Number(2.0))).unwrap();
    assert!(c.is_type_supported(ValueType::Vector3));
    assert!(c.is_type_supported(ValueType::Boolean));
    assert!(!c.is_type_supported(ValueType::Matrix));
    assert_eq!(c.value(t(0.0), ValueType::Vector3).unwrap(), Value::vec3(2.0, 2.0, 2.0));
    assert_eq!(c.value(t(0.0), ValueType::Boolean).unwrap(), Value::Boolean(true));
    assert!(c.value(t(0.0), ValueType::Matrix).is_err());

    let v = KFLinearCurve::new(ValueType::Vector3).unwrap();
    assert!(!v.is_type_supported(ValueType::Number));
}

#[test]
fn empty_query_is_rejected() {
    let c = KFStepCurve::new(ValueType::Boolean);
    assert!(c.invariance(Interval::EMPTY).is_err());
    let c = ConstantCurve::new(ValueType::Number, None).unwrap();
    assert!(c.invariance(Interval::EMPTY).is_err());
}

/// A host-defined curve with no constant spans.
struct Ramp {
    slope: Cell<f64>,
    listeners: ValueChangeListeners,
}

impl Ramp {
    fn set_slope(&self, slope: f64) {
        self.slope.set(slope);
        self.notify_value_change(UNIVERSAL);
    }
}

impl Curve for Ramp {
    fn is_type_supported(&self, ty: ValueType) -> bool {
        ty == ValueType::Number
    }

    fn value(&self, time: Time, _ty: ValueType) -> Result<Value> {
        Ok(Value::Number(self.slope.get() * time.to_number()))
    }

    fn invariance(&self, _interval: Interval) -> Result<Invariance> {
        Ok(Invariance::new())
    }

    fn listeners(&self) -> &ValueChangeListeners {
        &self.listeners
    }
}

#[test]
fn user_curves_compose_with_built_ins() {
    let ramp = Rc::new(Ramp {
        slope: Cell::new(1.0),
        listeners: ValueChangeListeners::new(),
    });
    let flat: Rc<dyn Curve> = Rc::new(ConstantCurve::new(ValueType::Number, None).unwrap());
    let ramp_dyn: Rc<dyn Curve> = ramp.clone();
    let combo = ComboVectorCurve::new(ValueType::Vector2, vec![ramp_dyn, flat]).unwrap();

    assert_eq!(combo.value(t(3.0), ValueType::Vector2).unwrap(), Value::vec2(3.0, 0.0));
    assert!(combo.invariance(UNIVERSAL).unwrap().is_empty());

    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    combo.add_value_change_listener(Rc::new(move |_| h.set(h.get() + 1)));
    ramp.set_slope(2.0);
    assert_eq!(hits.get(), 1);
    assert_eq!(combo.value(t(3.0), ValueType::Vector2).unwrap(), Value::vec2(6.0, 0.0));
}
