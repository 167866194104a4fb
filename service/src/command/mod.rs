//! [`Command`] definition.

pub mod create_rating;
pub mod create_rental;
pub mod delete_rating;
pub mod delete_rental;
pub mod recompute_rental_rating;
pub mod seed_sample_rentals;
pub mod update_rating;
pub mod update_rental;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_rating::CreateRating, create_rental::CreateRental,
    delete_rating::DeleteRating, delete_rental::DeleteRental,
    recompute_rental_rating::RecomputeRentalRating,
    seed_sample_rentals::SeedSampleRentals, update_rating::UpdateRating,
    update_rental::UpdateRental,
};

#[cfg(all(test, feature = "sqlite"))]
mod spec {
    use common::pagination::Order;

    use crate::{
        domain::{
            rating::{self, Score},
            rental,
        },
        infra::Sqlite,
        query,
        read::rental::list,
        Config, Service,
    };

    use super::{
        create_rating, delete_rating, delete_rental, recompute_rental_rating,
        update_rental, Command as _, CreateRating, CreateRental, DeleteRating,
        DeleteRental, RecomputeRentalRating, SeedSampleRentals, UpdateRating,
        UpdateRental,
    };

    type TestService = Service<Sqlite, ()>;

    async fn service() -> TestService {
        let db = Sqlite::new(Sqlite::IN_MEMORY).await.unwrap();
        db.migrate().await.unwrap();
        Service::new(Config::default(), db, ())
    }

    fn score(v: u8) -> Score {
        Score::new(v).unwrap()
    }

    fn new_rental(scores: Option<(u8, u8, u8)>) -> CreateRental {
        CreateRental {
            address: rental::Address::new("台北市信義區信義路五段7號").unwrap(),
            descriptive_address: None,
            lat: rental::Latitude::new(25.0330).unwrap(),
            lng: rental::Longitude::new(121.5654).unwrap(),
            description: None,
            rent_price: rental::RentPrice::new(25000),
            room_type: None,
            area_size: None,
            facilities: rental::Facilities::new(" 冷氣, ,網路"),
            landlord_rating: scores.map(|s| score(s.0)),
            location_rating: scores.map(|s| score(s.1)),
            value_rating: scores.map(|s| score(s.2)),
        }
    }

    fn new_rating(rental_id: rental::Id, l: u8, loc: u8, v: u8) -> CreateRating {
        CreateRating {
            rental_id,
            user_name: rating::UserName::new("tester"),
            landlord_rating: score(l),
            location_rating: score(loc),
            value_rating: score(v),
            comment: None,
        }
    }

    #[tokio::test]
    async fn creates_rental_with_exact_overall() {
        let svc = service().await;

        let rental = svc.execute(new_rental(Some((4, 5, 3)))).await.unwrap();

        assert_eq!(rental.overall_rating.map(f64::from), Some(4.0));
        assert_eq!(
            rental.facilities.as_ref().map(AsRef::<str>::as_ref),
            Some("冷氣,網路"),
        );
        assert_eq!(f64::from(rental.lat), 25.0330);
    }

    #[tokio::test]
    async fn creates_rental_without_overall_on_partial_scores() {
        let svc = service().await;
        let mut cmd = new_rental(Some((4, 5, 3)));
        cmd.value_rating = None;

        let rental = svc.execute(cmd).await.unwrap();

        assert!(rental.overall_rating.is_none());
        assert_eq!(rental.landlord_rating, Some(score(4)));
    }

    #[tokio::test]
    async fn aggregates_ratings_of_rental() {
        let svc = service().await;
        let rental = svc.execute(new_rental(None)).await.unwrap();

        _ = svc.execute(new_rating(rental.id, 4, 5, 3)).await.unwrap();
        let create_rating::Output { rental, .. } =
            svc.execute(new_rating(rental.id, 5, 4, 4)).await.unwrap();

        assert_eq!(rental.landlord_rating, Some(score(5)));
        assert_eq!(rental.location_rating, Some(score(5)));
        assert_eq!(rental.value_rating, Some(score(4)));
        let overall = rental.overall_rating.map(f64::from).unwrap();
        assert!((overall - 4.166_666_666).abs() < 1e-6);

        let stored = svc
            .execute(query::rental::ById::by(rental.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.overall_rating, rental.overall_rating);
    }

    #[tokio::test]
    async fn refuses_rating_unknown_rental() {
        let svc = service().await;

        let err = svc
            .execute(new_rating(rental::Id::from(42), 3, 3, 3))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            create_rating::ExecutionError::RentalNotExists(_),
        ));
    }

    #[tokio::test]
    async fn recomputes_on_rating_update_and_keeps_stale_on_last_delete() {
        let svc = service().await;
        let rental = svc.execute(new_rental(None)).await.unwrap();
        let create_rating::Output { rating, .. } =
            svc.execute(new_rating(rental.id, 2, 2, 2)).await.unwrap();

        let updated = svc
            .execute(UpdateRating {
                rental_id: rental.id,
                rating_id: rating.id,
                patch: rating::Patch {
                    landlord_rating: Some(score(5)),
                    comment: Some(rating::Comment::new("fixed the roof")),
                    ..rating::Patch::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(f64::from(updated.overall_rating), 3.0);
        assert!(updated.updated_at >= rating.updated_at);

        let recomputed = svc
            .execute(RecomputeRentalRating {
                rental_id: rental.id,
            })
            .await
            .unwrap();
        assert_eq!(recomputed.landlord_rating, Some(score(5)));
        assert_eq!(recomputed.overall_rating.map(f64::from), Some(3.0));

        svc.execute(DeleteRating {
            rental_id: rental.id,
            rating_id: rating.id,
        })
        .await
        .unwrap();

        let stale = svc
            .execute(query::rental::ById::by(rental.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stale.landlord_rating, Some(score(5)));
        assert_eq!(stale.overall_rating.map(f64::from), Some(3.0));
        assert!(svc
            .execute(query::ratings::ByRental::by(rental.id))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn refuses_rating_of_another_rental() {
        let svc = service().await;
        let first = svc.execute(new_rental(None)).await.unwrap();
        let second = svc.execute(new_rental(None)).await.unwrap();
        let create_rating::Output { rating, .. } =
            svc.execute(new_rating(first.id, 3, 3, 3)).await.unwrap();

        let err = svc
            .execute(DeleteRating {
                rental_id: second.id,
                rating_id: rating.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            delete_rating::ExecutionError::RatingNotExists(_),
        ));
        assert!(svc
            .execute(query::rating::ById::by((first.id, rating.id)))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn patches_rental() {
        let svc = service().await;
        let rental = svc.execute(new_rental(Some((4, 5, 3)))).await.unwrap();

        let updated = svc
            .execute(UpdateRental {
                rental_id: rental.id,
                patch: rental::Patch {
                    description: Some(rental::Description::new("quiet")),
                    rent_price: Some(None),
                    value_rating: Some(Some(score(5))),
                    ..rental::Patch::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.address, rental.address);
        assert_eq!(
            updated.description.as_ref().map(ToString::to_string),
            Some("quiet".into()),
        );
        assert!(updated.rent_price.is_none());
        let overall = updated.overall_rating.map(f64::from).unwrap();
        assert!((overall - 14.0 / 3.0).abs() < 1e-9);

        let err = svc
            .execute(UpdateRental {
                rental_id: rental::Id::from(999),
                patch: rental::Patch::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            update_rental::ExecutionError::RentalNotExists(_),
        ));
    }

    #[tokio::test]
    async fn deletes_rental_with_its_ratings() {
        let svc = service().await;
        let rental = svc.execute(new_rental(None)).await.unwrap();
        _ = svc.execute(new_rating(rental.id, 4, 4, 4)).await.unwrap();
        _ = svc.execute(new_rating(rental.id, 1, 2, 3)).await.unwrap();

        svc.execute(DeleteRental {
            rental_id: rental.id,
        })
        .await
        .unwrap();

        assert!(svc
            .execute(query::rental::ById::by(rental.id))
            .await
            .unwrap()
            .is_none());
        assert!(svc
            .execute(query::ratings::ByRental::by(rental.id))
            .await
            .unwrap()
            .is_empty());

        let err = svc
            .execute(DeleteRental {
                rental_id: rental.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            delete_rental::ExecutionError::RentalNotExists(_),
        ));
    }

    #[tokio::test]
    async fn recompute_reports_unknown_rental() {
        let svc = service().await;

        let err = svc
            .execute(RecomputeRentalRating {
                rental_id: rental::Id::from(7),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            recompute_rental_rating::ExecutionError::RentalNotExists(_),
        ));
    }

    #[tokio::test]
    async fn seeds_samples_into_empty_database_only() {
        let svc = service().await;

        let seeded = svc.execute(SeedSampleRentals).await.unwrap();
        assert_eq!(seeded.len(), 2);
        assert_eq!(seeded[0].overall_rating.map(f64::from), Some(4.0));

        let again = svc.execute(SeedSampleRentals).await.unwrap();
        assert!(again.is_empty());
        let page = svc
            .execute(query::rentals::List::by(list::Selector {
                arguments: list::Arguments::default(),
                sort: list::Sort::default(),
                order: Order::default(),
                filter: (),
            }))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
    }
}
