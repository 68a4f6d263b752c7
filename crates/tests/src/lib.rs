
#[cfg(test)]
mod callback_submitted_tests;

#[cfg(test)]
mod callback_removal_tests;

#[cfg(test)]
mod filter_endpoint_tests;


#[cfg(test)]
mod pronouncement_tests;

#[cfg(test)]
mod schedule_tests;

#[cfg(test)]
mod failed_bulk_case_tests;

#[cfg(test)]
mod due_date_progression_tests;

#[cfg(test)]
mod scheduler_tests;
