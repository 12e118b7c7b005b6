pub mod fixtures;

#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod invitation_tests;
#[cfg(test)]
mod otp_tests;
