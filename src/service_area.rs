//! Static registry of the cities the agent serves.
//!
//! A handful of primary towns carry the marketing focus; the extended list
//! covers everything else across the four northwest New Jersey counties.
//! Pure configuration, nothing here is persisted.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceArea {
    pub city: &'static str,
    pub county: &'static str,
    pub state: &'static str,
    pub zip: &'static str,
    pub primary: bool,
}

const fn area(city: &'static str, county: &'static str, zip: &'static str) -> ServiceArea {
    ServiceArea {
        city,
        county,
        state: "NJ",
        zip,
        primary: false,
    }
}

const fn primary_area(city: &'static str, county: &'static str, zip: &'static str) -> ServiceArea {
    ServiceArea {
        city,
        county,
        state: "NJ",
        zip,
        primary: true,
    }
}

static SERVICE_AREAS: &[ServiceArea] = &[
    // Primary towns
    primary_area("Hackettstown", "Warren", "07840"),
    primary_area("Washington", "Warren", "07882"),
    primary_area("Blairstown", "Warren", "07825"),
    primary_area("Long Valley", "Morris", "07853"),
    primary_area("Budd Lake", "Morris", "07828"),
    primary_area("Flanders", "Morris", "07836"),
    primary_area("Andover", "Sussex", "07821"),
    primary_area("Califon", "Hunterdon", "07830"),
    // Warren County
    area("Belvidere", "Warren", "07823"),
    area("Phillipsburg", "Warren", "08865"),
    area("Oxford", "Warren", "07863"),
    area("Great Meadows", "Warren", "07838"),
    area("Port Murray", "Warren", "07865"),
    area("Columbia", "Warren", "07832"),
    area("Hope", "Warren", "07844"),
    area("Stewartsville", "Warren", "08886"),
    // Morris County
    area("Chester", "Morris", "07930"),
    area("Mendham", "Morris", "07945"),
    area("Netcong", "Morris", "07857"),
    area("Mount Arlington", "Morris", "07856"),
    area("Wharton", "Morris", "07885"),
    area("Dover", "Morris", "07801"),
    area("Randolph", "Morris", "07869"),
    area("Succasunna", "Morris", "07876"),
    area("Landing", "Morris", "07850"),
    area("Morristown", "Morris", "07960"),
    area("Rockaway", "Morris", "07866"),
    area("Denville", "Morris", "07834"),
    // Sussex County
    area("Newton", "Sussex", "07860"),
    area("Sparta", "Sussex", "07871"),
    area("Hopatcong", "Sussex", "07843"),
    area("Stanhope", "Sussex", "07874"),
    area("Franklin", "Sussex", "07416"),
    area("Hamburg", "Sussex", "07419"),
    area("Vernon", "Sussex", "07462"),
    area("Augusta", "Sussex", "07822"),
    area("Branchville", "Sussex", "07826"),
    area("Lafayette", "Sussex", "07848"),
    // Hunterdon County
    area("Clinton", "Hunterdon", "08809"),
    area("Flemington", "Hunterdon", "08822"),
    area("Lebanon", "Hunterdon", "08833"),
    area("High Bridge", "Hunterdon", "08829"),
    area("Glen Gardner", "Hunterdon", "08826"),
    area("Hampton", "Hunterdon", "08827"),
    area("Frenchtown", "Hunterdon", "08825"),
    area("Whitehouse Station", "Hunterdon", "08889"),
];

pub fn all() -> &'static [ServiceArea] {
    SERVICE_AREAS
}

pub fn primary() -> Vec<&'static ServiceArea> {
    SERVICE_AREAS.iter().filter(|a| a.primary).collect()
}

pub fn in_county(county: &str) -> Vec<&'static ServiceArea> {
    SERVICE_AREAS
        .iter()
        .filter(|a| a.county.eq_ignore_ascii_case(county))
        .collect()
}

/// Case-insensitive lookup by city and state.
pub fn find(city: &str, state: &str) -> Option<&'static ServiceArea> {
    SERVICE_AREAS
        .iter()
        .find(|a| a.city.eq_ignore_ascii_case(city) && a.state.eq_ignore_ascii_case(state))
}

pub fn is_service_area(city: &str, state: &str) -> bool {
    find(city, state).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_is_subset_of_all() {
        let primary = primary();
        assert!(!primary.is_empty());
        assert!(primary.len() < all().len());
        assert!(primary.iter().all(|a| a.primary));
    }

    #[test]
    fn membership_is_case_insensitive() {
        assert!(is_service_area("hackettstown", "nj"));
        assert!(is_service_area("HACKETTSTOWN", "NJ"));
        assert!(!is_service_area("Trenton", "NJ"));
        assert!(!is_service_area("Hackettstown", "PA"));
    }

    #[test]
    fn county_lookup_returns_all_towns() {
        let warren = in_county("warren");
        assert!(warren.iter().any(|a| a.city == "Hackettstown"));
        assert!(warren.iter().any(|a| a.city == "Belvidere"));
        assert!(warren.iter().all(|a| a.county == "Warren"));
    }

    #[test]
    fn every_area_has_a_zip() {
        assert!(all().iter().all(|a| a.zip.len() == 5));
    }
}
