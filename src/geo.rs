const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two `(lat, lng)` points.
pub fn distance_km((lat1, lng1): (f64, f64), (lat2, lng2): (f64, f64)) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Badge text for a distance, as shown on cards.
pub fn distance_label(km: f64) -> String {
    if km < 1.0 {
        "Nearby".to_owned()
    } else {
        format!("{km:.0} km")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mumbai_to_pune() {
        let km = distance_km((19.0760, 72.8777), (18.5204, 73.8567));
        assert!((115.0..125.0).contains(&km), "{km}");
    }

    #[test]
    fn same_point_is_nearby() {
        let here = (19.07, 72.87);
        assert_eq!(distance_km(here, here), 0.0);
        assert_eq!(distance_label(distance_km(here, (19.0760, 72.8777))), "Nearby");
        assert_eq!(distance_label(42.4), "42 km");
    }
}
