use pinpoint::shared::geo::{Click, Coordinate, Error};

#[test]
fn click_is_rounded() {
    let coordinate = Coordinate::try_from(Click::from((44.64059687, -63.57846665))).unwrap();
    assert_eq!(coordinate.latitude_string(), "44.6406");
    assert_eq!(coordinate.longitude_string(), "-63.5785");
}

#[test]
fn bounds_are_inclusive() {
    assert!(Coordinate::new(90.0, 180.0).is_ok());
    assert!(Coordinate::new(-90.0, -180.0).is_ok());
}

#[test]
fn latitude_out_of_range() {
    assert_eq!(
        Coordinate::new(90.5, 0.0).unwrap_err(),
        Error::InvalidLatitude(90.5)
    );
}

#[test]
fn longitude_out_of_range() {
    assert_eq!(
        Coordinate::new(0.0, -180.01).unwrap_err(),
        Error::InvalidLongitude(-180.01)
    );
}

#[test]
fn display_keeps_trailing_zeros() {
    let coordinate = Coordinate::new(45.0, -63.5).unwrap();
    assert_eq!(coordinate.latitude_string(), "45.0000");
    assert_eq!(coordinate.longitude_string(), "-63.5000");
}
